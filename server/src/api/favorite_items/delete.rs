use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::favorite_items;
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
    path = "/api/favorite-items/{id}",
    tag = "favorite_items",
    params(
        ("id" = Uuid, Path, description = "Favorite item ID")
    ),
    responses(
        (status = 204, description = "Favorite deleted"),
        (status = 404, description = "Favorite not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let deleted = diesel::delete(
        favorite_items::table
            .filter(favorite_items::id.eq(id))
            .filter(favorite_items::user_id.eq(user.id)),
    )
    .execute(&mut conn)?;

    if deleted == 0 {
        return Err(ApiError::not_found("Favorite"));
    }

    Ok(StatusCode::NO_CONTENT)
}
