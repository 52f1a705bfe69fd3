//! The caller's saved community recipes.
//!
//! Saved rows hold bare ids with no foreign key, so a deleted recipe simply
//! stops resolving. Listing reads the ids, resolves what still exists and
//! only then sorts and paginates.

pub mod list;
pub mod official_ids;
pub mod save;
pub mod unsave;

use crate::schema::{community_recipes, saved_community_recipes};
use crate::AppState;
use axum::routing::{delete, get};
use axum::Router;
use diesel::prelude::*;
use potluck_core::{saved_official_ids, SavedSet};
use std::collections::HashSet;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/saved-community-recipes endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_saved).post(save::save_recipe))
        .route("/official-ids", get(official_ids::list_saved_official_ids))
        .route("/{id}", delete(unsave::unsave_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_saved,
        save::save_recipe,
        unsave::unsave_recipe,
        official_ids::list_saved_official_ids,
    ),
    components(schemas(save::SaveRecipeRequest, official_ids::SavedOfficialIdsResponse))
)]
pub struct ApiDoc;

/// The user's saved ids, oldest save first.
pub(crate) fn load_saved_set(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<SavedSet> {
    let ids: Vec<Uuid> = saved_community_recipes::table
        .filter(saved_community_recipes::user_id.eq(user_id))
        .order(saved_community_recipes::created_at.asc())
        .select(saved_community_recipes::community_recipe_id)
        .load(conn)?;
    Ok(SavedSet::from_ids(ids))
}

/// Official recipe ids whose community twin the user has saved.
pub(crate) fn load_saved_official_ids(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<HashSet<Uuid>> {
    let saved = load_saved_set(conn, user_id)?;
    if saved.is_empty() {
        return Ok(HashSet::new());
    }

    let twins: Vec<(Uuid, Option<Uuid>)> = community_recipes::table
        .filter(community_recipes::id.eq_any(saved.ids().to_vec()))
        .filter(community_recipes::source_recipe_id.is_not_null())
        .select((community_recipes::id, community_recipes::source_recipe_id))
        .load(conn)?;

    Ok(saved_official_ids(&saved, twins))
}
