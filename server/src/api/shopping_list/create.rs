use super::ShoppingListItemResponse;
use crate::api::shops::{load_shop_names, resolve_shop_refs};
use crate::api::suggestions::remember_item;
use crate::api::{ApiError, ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewShoppingListItem, ShoppingListItem};
use crate::schema::shopping_list_items;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use potluck_core::ShopRef;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShoppingListItemRequest {
    pub text: String,
    /// Shop ids, or `{id, name}` objects as returned by the API
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub shops: Vec<ShopRef>,
}

#[utoipa::path(
    post,
    path = "/api/shopping-list",
    tag = "shopping_list",
    request_body = CreateShoppingListItemRequest,
    responses(
        (status = 201, description = "Item created", body = ShoppingListItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(request): ApiJson<CreateShoppingListItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::Validation("Item text is required".to_string()));
    }

    let mut conn = pool.get()?;
    let shop_ids = resolve_shop_refs(&mut conn, user.id, &request.shops)?;

    let item = conn.transaction::<_, ApiError, _>(|conn| {
        let max_sort_order: Option<i32> = shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user.id))
            .select(diesel::dsl::max(shopping_list_items::sort_order))
            .first(conn)?;

        let item: ShoppingListItem = diesel::insert_into(shopping_list_items::table)
            .values(&NewShoppingListItem {
                user_id: user.id,
                text,
                shop_ids: &shop_ids,
                is_checked: false,
                sort_order: max_sort_order.unwrap_or(0) + 1,
            })
            .returning(ShoppingListItem::as_returning())
            .get_result(conn)?;

        remember_item(conn, user.id, text)?;
        Ok(item)
    })?;

    let shop_names = load_shop_names(&mut conn, user.id)?;
    Ok((
        StatusCode::CREATED,
        Json(ShoppingListItemResponse::new(item, &shop_names)),
    ))
}
