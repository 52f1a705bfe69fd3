use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::raw_sql::{REMOVE_SHOP_FROM_FAVORITES, REMOVE_SHOP_FROM_LIST_ITEMS};
use crate::schema::shops;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use diesel::sql_types;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/shops/{id}",
    tag = "shops",
    params(
        ("id" = Uuid, Path, description = "Shop ID")
    ),
    responses(
        (status = 204, description = "Shop deleted and removed from every list and favorite item"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Shop not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_shop(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    conn.transaction::<_, ApiError, _>(|conn| {
        let deleted = diesel::delete(
            shops::table
                .filter(shops::id.eq(id))
                .filter(shops::user_id.eq(user.id)),
        )
        .execute(conn)?;
        if deleted == 0 {
            return Err(ApiError::not_found("Shop"));
        }

        let list_items = diesel::sql_query(REMOVE_SHOP_FROM_LIST_ITEMS)
            .bind::<sql_types::Uuid, _>(id)
            .bind::<sql_types::Uuid, _>(user.id)
            .execute(conn)?;
        let favorites = diesel::sql_query(REMOVE_SHOP_FROM_FAVORITES)
            .bind::<sql_types::Uuid, _>(id)
            .bind::<sql_types::Uuid, _>(user.id)
            .execute(conn)?;

        tracing::info!(
            shop_id = %id,
            list_items,
            favorites,
            "Deleted shop and detached it from items"
        );
        Ok(())
    })?;

    Ok(StatusCode::NO_CONTENT)
}
