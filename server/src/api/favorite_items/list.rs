use super::FavoriteItemResponse;
use crate::api::shops::load_shop_names;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::FavoriteItem;
use crate::schema::favorite_items;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteItemsResponse {
    pub items: Vec<FavoriteItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/favorite-items",
    tag = "favorite_items",
    responses(
        (status = 200, description = "The caller's favorite items", body = FavoriteItemsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_favorites(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let rows: Vec<FavoriteItem> = favorite_items::table
        .filter(favorite_items::user_id.eq(user.id))
        .order(favorite_items::sort_order.asc())
        .select(FavoriteItem::as_select())
        .load(&mut conn)?;

    let shop_names = load_shop_names(&mut conn, user.id)?;
    let items = rows
        .into_iter()
        .map(|item| FavoriteItemResponse::new(item, &shop_names))
        .collect();

    Ok(Json(FavoriteItemsResponse { items }))
}
