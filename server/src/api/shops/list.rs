use super::ShopSummary;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::Shop;
use crate::schema::shops;
use axum::{extract::State, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShopsResponse {
    pub shops: Vec<ShopSummary>,
}

#[utoipa::path(
    get,
    path = "/api/shops",
    tag = "shops",
    responses(
        (status = 200, description = "The caller's shops, by name", body = ShopsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_shops(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let rows: Vec<Shop> = shops::table
        .filter(shops::user_id.eq(user.id))
        .order(shops::name.asc())
        .select(Shop::as_select())
        .load(&mut conn)?;

    let shops = rows
        .into_iter()
        .map(|s| ShopSummary {
            id: s.id,
            name: s.name,
        })
        .collect();

    Ok(Json(ShopsResponse { shops }))
}
