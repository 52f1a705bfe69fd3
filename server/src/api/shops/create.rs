use super::ShopSummary;
use crate::api::{conflict_on_unique, ApiError, ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{NewShop, Shop};
use crate::schema::shops;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateShopRequest {
    pub name: String,
}

#[utoipa::path(
    post,
    path = "/api/shops",
    tag = "shops",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Shop created", body = ShopSummary),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "A shop with this name already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_shop(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<CreateShopRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Shop name cannot be empty".to_string()));
    }

    let mut conn = pool.get()?;

    let shop: Shop = diesel::insert_into(shops::table)
        .values(&NewShop {
            user_id: user.id,
            name,
        })
        .returning(Shop::as_returning())
        .get_result(&mut conn)
        .map_err(|e| conflict_on_unique(e, "A shop with this name already exists"))?;

    Ok((
        StatusCode::CREATED,
        Json(ShopSummary {
            id: shop.id,
            name: shop.name,
        }),
    ))
}
