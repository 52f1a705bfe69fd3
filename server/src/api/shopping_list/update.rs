use super::ShoppingListItemResponse;
use crate::api::shops::{load_shop_names, resolve_shop_refs};
use crate::api::suggestions::remember_item;
use crate::api::{ApiError, ApiJson, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{ShoppingListItem, ShoppingListItemChanges};
use crate::schema::shopping_list_items;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use diesel::prelude::*;
use potluck_core::ShopRef;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema, Default)]
pub struct UpdateShoppingListItemRequest {
    pub text: Option<String>,
    /// Replaces the item's shops when present
    #[schema(value_type = Option<Vec<Object>>)]
    pub shops: Option<Vec<ShopRef>>,
    pub is_checked: Option<bool>,
}

#[utoipa::path(
    put,
    path = "/api/shopping-list/{id}",
    tag = "shopping_list",
    params(
        ("id" = Uuid, Path, description = "Shopping list item ID")
    ),
    request_body = UpdateShoppingListItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ShoppingListItemResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_item(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateShoppingListItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let text = request.text.as_deref().map(str::trim);
    if text == Some("") {
        return Err(ApiError::Validation("Item text cannot be empty".to_string()));
    }

    let mut conn = pool.get()?;

    let shop_ids = match &request.shops {
        Some(refs) => Some(resolve_shop_refs(&mut conn, user.id, refs)?),
        None => None,
    };

    let item = conn.transaction::<_, ApiError, _>(|conn| {
        let item: ShoppingListItem = diesel::update(
            shopping_list_items::table
                .filter(shopping_list_items::id.eq(id))
                .filter(shopping_list_items::user_id.eq(user.id)),
        )
        .set(&ShoppingListItemChanges {
            text,
            shop_ids,
            is_checked: request.is_checked,
            updated_at: Utc::now(),
        })
        .returning(ShoppingListItem::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Item"))?;

        if let Some(text) = text {
            remember_item(conn, user.id, text)?;
        }
        Ok(item)
    })?;

    let shop_names = load_shop_names(&mut conn, user.id)?;
    Ok(Json(ShoppingListItemResponse::new(item, &shop_names)))
}
