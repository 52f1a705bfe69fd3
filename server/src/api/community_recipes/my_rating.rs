use super::find_recipe;
use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::schema::community_recipe_ratings;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MyRatingResponse {
    /// 1-5, or null if the caller has not rated this recipe
    pub value: Option<i16>,
}

#[utoipa::path(
    get,
    path = "/api/community-recipes/{id}/my-rating",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    responses(
        (status = 200, description = "The caller's rating", body = MyRatingResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_rating(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    find_recipe(&mut conn, id)?;

    let value: Option<i16> = community_recipe_ratings::table
        .find((id, user.id))
        .select(community_recipe_ratings::value)
        .first(&mut conn)
        .optional()?;

    Ok(Json(MyRatingResponse { value }))
}
