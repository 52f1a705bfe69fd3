use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::shopping_list_items;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClearCheckedResponse {
    pub deleted_count: usize,
}

#[utoipa::path(
    delete,
    path = "/api/shopping-list/clear-checked",
    tag = "shopping_list",
    responses(
        (status = 200, description = "Checked items cleared", body = ClearCheckedResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn clear_checked(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user.id))
            .filter(shopping_list_items::is_checked.eq(true)),
    )
    .execute(&mut conn)?;

    Ok(Json(ClearCheckedResponse {
        deleted_count: deleted,
    }))
}
