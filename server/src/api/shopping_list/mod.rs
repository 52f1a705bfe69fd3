pub mod clear_checked;
pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use crate::api::shops::{populate, ShopSummary};
use crate::models::ShoppingListItem;
use crate::AppState;
use axum::routing::{delete as delete_method, get, put};
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/shopping-list endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_items).post(create::create_item))
        .route(
            "/clear-checked",
            delete_method(clear_checked::clear_checked),
        )
        .route(
            "/{id}",
            put(update::update_item).delete(delete::delete_item),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_items,
        create::create_item,
        update::update_item,
        delete::delete_item,
        clear_checked::clear_checked
    ),
    components(schemas(
        ShoppingListItemResponse,
        list::ShoppingListResponse,
        create::CreateShoppingListItemRequest,
        update::UpdateShoppingListItemRequest,
        clear_checked::ClearCheckedResponse,
    ))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShoppingListItemResponse {
    pub id: Uuid,
    pub text: String,
    pub shops: Vec<ShopSummary>,
    pub is_checked: bool,
    pub sort_order: i32,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingListItemResponse {
    pub fn new(item: ShoppingListItem, shop_names: &HashMap<Uuid, String>) -> Self {
        Self {
            shops: populate(&item.shop_ids, shop_names),
            id: item.id,
            text: item.text,
            is_checked: item.is_checked,
            sort_order: item.sort_order,
            updated_at: item.updated_at,
        }
    }
}
