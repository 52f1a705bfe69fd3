pub mod create;
pub mod delete;
pub mod ensure;
pub mod get;
pub mod list;
pub mod media;
pub mod my_rating;
pub mod rate;
pub mod views;

use crate::api::ApiError;
use crate::models::CommunityRecipe;
use crate::schema::community_recipes;
use crate::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use diesel::prelude::*;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/community-recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::list_community_recipes).post(create::create_community_recipe),
        )
        .route(
            "/ensure-from-recipe/{official_id}",
            post(ensure::ensure_from_recipe),
        )
        .route(
            "/{id}",
            get(get::get_community_recipe).delete(delete::delete_community_recipe),
        )
        .route("/{id}/rate", post(rate::rate_recipe))
        .route("/{id}/my-rating", get(my_rating::my_rating))
        .route("/{id}/cover", put(media::put_cover))
        .route(
            "/{id}/steps/{index}/media",
            put(media::put_step_media).delete(media::delete_step_media),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_community_recipes,
        create::create_community_recipe,
        get::get_community_recipe,
        delete::delete_community_recipe,
        ensure::ensure_from_recipe,
        rate::rate_recipe,
        my_rating::my_rating,
        media::put_cover,
        media::put_step_media,
        media::delete_step_media,
    ),
    components(schemas(
        views::CommunityRecipeSummary,
        views::CommunityRecipeDetail,
        views::CommunityRecipePage,
        create::CreateCommunityRecipeRequest,
        create::CreateStepRequest,
        ensure::EnsureTwinResponse,
        rate::RateRequest,
        rate::RateResponse,
        my_rating::MyRatingResponse,
        media::UploadMediaRequest,
        media::AttachMediaResponse,
    ))
)]
pub struct ApiDoc;

pub(crate) fn find_recipe(conn: &mut PgConnection, id: Uuid) -> Result<CommunityRecipe, ApiError> {
    community_recipes::table
        .find(id)
        .select(CommunityRecipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Community recipe"))
}

/// Load a recipe the user may modify. Twins have no owner, so nobody may.
pub(crate) fn find_owned_recipe(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
) -> Result<CommunityRecipe, ApiError> {
    let recipe = find_recipe(conn, id)?;
    if !recipe.is_owned_by(user_id) {
        return Err(ApiError::Forbidden(
            "You do not own this recipe".to_string(),
        ));
    }
    Ok(recipe)
}
