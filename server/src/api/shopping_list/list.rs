use super::ShoppingListItemResponse;
use crate::api::shops::load_shop_names;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::ShoppingListItem;
use crate::schema::shopping_list_items;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListResponse {
    pub items: Vec<ShoppingListItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/shopping-list",
    tag = "shopping_list",
    responses(
        (status = 200, description = "List of shopping list items", body = ShoppingListResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_items(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let rows: Vec<ShoppingListItem> = shopping_list_items::table
        .filter(shopping_list_items::user_id.eq(user.id))
        .order((
            shopping_list_items::is_checked.asc(),
            shopping_list_items::sort_order.asc(),
        ))
        .select(ShoppingListItem::as_select())
        .load(&mut conn)?;

    let shop_names = load_shop_names(&mut conn, user.id)?;
    let items = rows
        .into_iter()
        .map(|item| ShoppingListItemResponse::new(item, &shop_names))
        .collect();

    Ok(Json(ShoppingListResponse { items }))
}
