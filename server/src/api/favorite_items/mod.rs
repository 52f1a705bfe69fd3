pub mod create;
pub mod delete;
pub mod list;

use crate::api::shops::{populate, ShopSummary};
use crate::models::FavoriteItem;
use crate::AppState;
use axum::routing::{delete as delete_method, get};
use axum::Router;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for /api/favorite-items endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_favorites).post(create::create_favorite))
        .route("/{id}", delete_method(delete::delete_favorite))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_favorites, create::create_favorite, delete::delete_favorite),
    components(schemas(
        FavoriteItemResponse,
        list::FavoriteItemsResponse,
        create::CreateFavoriteItemRequest,
    ))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavoriteItemResponse {
    pub id: Uuid,
    pub text: String,
    pub shops: Vec<ShopSummary>,
    pub sort_order: i32,
}

impl FavoriteItemResponse {
    pub fn new(item: FavoriteItem, shop_names: &HashMap<Uuid, String>) -> Self {
        Self {
            shops: populate(&item.shop_ids, shop_names),
            id: item.id,
            text: item.text,
            sort_order: item.sort_order,
        }
    }
}
