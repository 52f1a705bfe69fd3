use super::OfficialRecipeDetail;
use crate::api::saved::load_saved_official_ids;
use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::OfficialRecipe;
use crate::schema::recipes;
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
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Official recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details", body = OfficialRecipeDetail),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let recipe: OfficialRecipe = recipes::table
        .find(id)
        .select(OfficialRecipe::as_select())
        .first(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe"))?;

    let is_saved = match user {
        Some(user) => load_saved_official_ids(&mut conn, user.id)?.contains(&id),
        None => false,
    };

    Ok(Json(OfficialRecipeDetail {
        id: recipe.id,
        title: recipe.title.clone(),
        difficulty: recipe.difficulty.clone(),
        time_label: recipe.time_label.clone(),
        cover_image: recipe.cover_image.clone(),
        ingredients: recipe.ingredients(),
        steps: recipe.steps(),
        is_saved,
    }))
}
