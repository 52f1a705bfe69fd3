use super::find_recipe;
use super::views::CommunityRecipeDetail;
use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::schema::{community_recipe_ratings, saved_community_recipes};
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/community-recipes/{id}",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = CommunityRecipeDetail),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_community_recipe(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let recipe = find_recipe(&mut conn, id)?;

    let viewer = user.map(|u| u.id);
    let (my_rating, is_saved) = match viewer {
        Some(user_id) => {
            let my_rating: Option<i16> = community_recipe_ratings::table
                .find((id, user_id))
                .select(community_recipe_ratings::value)
                .first(&mut conn)
                .optional()?;
            let is_saved: bool = diesel::select(diesel::dsl::exists(
                saved_community_recipes::table.find((user_id, id)),
            ))
            .get_result(&mut conn)?;
            (my_rating, is_saved)
        }
        None => (None, false),
    };

    Ok(Json(CommunityRecipeDetail::new(
        &recipe, viewer, my_rating, is_saved,
    )))
}
