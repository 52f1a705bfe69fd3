use crate::api::{ApiError, ApiJson, ErrorResponse};
use crate::auth::{create_session, verify_password};
use crate::db::DbPool;
use crate::models::User;
use crate::schema::users;
use crate::username_or_email_is;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username or email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body(content = LoginRequest, example = json!({"username": "cook", "password": "password"})),
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login(
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let login = req.username.trim();

    let user: User = users::table
        .filter(username_or_email_is!(login))
        .select(User::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(invalid_credentials)?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(invalid_credentials());
    }

    let token = create_session(&mut conn, user.id)?;

    Ok(Json(LoginResponse { token }))
}
