//! Per-user item suggestion cache.
//!
//! `users.item_suggestions` is derived data: when it is empty it gets
//! rebuilt from the user's shopping list and favorite item texts, and new
//! item texts are appended as they are entered.

pub mod list;

use crate::schema::{favorite_items, shopping_list_items, users};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use diesel::prelude::*;
use potluck_core::ItemSuggestions;
use utoipa::OpenApi;
use uuid::Uuid;

/// Returns the router for /api/item-suggestions
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list::list_suggestions))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_suggestions),
    components(schemas(list::SuggestionsResponse))
)]
pub struct ApiDoc;

fn persist(conn: &mut PgConnection, user_id: Uuid, suggestions: &ItemSuggestions) -> QueryResult<()> {
    diesel::update(users::table.find(user_id))
        .set(users::item_suggestions.eq(suggestions.items()))
        .execute(conn)?;
    Ok(())
}

/// Load the cache, rebuilding and saving it first if it is empty.
pub(crate) fn load_suggestions(
    conn: &mut PgConnection,
    user_id: Uuid,
) -> QueryResult<ItemSuggestions> {
    let stored: Vec<String> = users::table
        .find(user_id)
        .select(users::item_suggestions)
        .first(conn)?;
    let mut suggestions = ItemSuggestions::from_stored(stored);

    if suggestions.is_empty() {
        let list_texts: Vec<String> = shopping_list_items::table
            .filter(shopping_list_items::user_id.eq(user_id))
            .order((
                shopping_list_items::created_at.asc(),
                shopping_list_items::id.asc(),
            ))
            .select(shopping_list_items::text)
            .load(conn)?;
        let favorite_texts: Vec<String> = favorite_items::table
            .filter(favorite_items::user_id.eq(user_id))
            .order((favorite_items::created_at.asc(), favorite_items::id.asc()))
            .select(favorite_items::text)
            .load(conn)?;

        let history = list_texts.iter().chain(favorite_texts.iter()).map(String::as_str);
        if suggestions.seed_if_empty(history) {
            persist(conn, user_id, &suggestions)?;
            tracing::debug!(
                user_id = %user_id,
                count = suggestions.items().len(),
                "Rebuilt item suggestions"
            );
        }
    }

    Ok(suggestions)
}

/// Add an item text to the cache.
pub(crate) fn remember_item(conn: &mut PgConnection, user_id: Uuid, text: &str) -> QueryResult<()> {
    let mut suggestions = load_suggestions(conn, user_id)?;
    if suggestions.add(text) {
        persist(conn, user_id, &suggestions)?;
    }
    Ok(())
}
