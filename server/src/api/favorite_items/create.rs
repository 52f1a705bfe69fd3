use super::FavoriteItemResponse;
use crate::api::shops::{load_shop_names, resolve_shop_refs};
use crate::api::suggestions::remember_item;
use crate::api::{ApiError, ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{FavoriteItem, NewFavoriteItem};
use crate::schema::favorite_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use potluck_core::ShopRef;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFavoriteItemRequest {
    pub text: String,
    /// Shop ids, or `{id, name}` objects as returned by the API
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub shops: Vec<ShopRef>,
}

#[utoipa::path(
    post,
    path = "/api/favorite-items",
    tag = "favorite_items",
    request_body = CreateFavoriteItemRequest,
    responses(
        (status = 201, description = "Favorite created", body = FavoriteItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_favorite(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateFavoriteItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Item text is required".to_string()));
    }

    let mut conn = pool.get()?;
    let shop_ids = resolve_shop_refs(&mut conn, user.id, &request.shops)?;

    let item = conn.transaction::<_, ApiError, _>(|conn| {
        let max_sort_order: Option<i32> = favorite_items::table
            .filter(favorite_items::user_id.eq(user.id))
            .select(diesel::dsl::max(favorite_items::sort_order))
            .first(conn)?;

        let item: FavoriteItem = diesel::insert_into(favorite_items::table)
            .values(&NewFavoriteItem {
                user_id: user.id,
                text,
                shop_ids: &shop_ids,
                sort_order: max_sort_order.unwrap_or(0) + 1,
            })
            .returning(FavoriteItem::as_returning())
            .get_result(conn)?;

        remember_item(conn, user.id, text)?;
        Ok(item)
    })?;

    let shop_names = load_shop_names(&mut conn, user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(FavoriteItemResponse::new(item, &shop_names)),
    ))
}
