use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::saved_community_recipes;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/saved-community-recipes/{id}",
    tag = "saved",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe is not saved (whether or not it was before)"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn unsave_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    diesel::delete(saved_community_recipes::table.find((user.id, id))).execute(&mut conn)?;

    Ok(StatusCode::NO_CONTENT)
}
