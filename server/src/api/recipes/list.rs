use super::{OfficialRecipePage, OfficialRecipeSummary};
use crate::api::saved::load_saved_official_ids;
use crate::api::{search_term, ApiError, ApiQuery, ErrorResponse};
use crate::auth::MaybeAuthUser;
use crate::db::DbPool;
use crate::models::OfficialRecipe;
use crate::schema::recipes;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use potluck_core::{Page, PageRequest};
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// 1-indexed page (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 12, max: 50)
    pub limit: Option<i64>,
    /// Case-insensitive title substring
    pub q: Option<String>,
}

fn filtered(pattern: Option<&str>) -> recipes::BoxedQuery<'_, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(pattern) = pattern {
        query = query.filter(recipes::title.ilike(pattern));
    }
    query
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "One page of the official catalog", body = OfficialRecipePage),
        (status = 401, description = "Invalid token", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    MaybeAuthUser(user): MaybeAuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<ListRecipesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(params.page, params.limit);
    let pattern = search_term(params.q.as_deref());

    let mut conn = pool.get()?;

    let total: i64 = filtered(pattern.as_deref()).count().get_result(&mut conn)?;

    let recipes: Vec<OfficialRecipe> = filtered(pattern.as_deref())
        .order((recipes::created_at.desc(), recipes::id.desc()))
        .select(OfficialRecipe::as_select())
        .limit(request.limit)
        .offset(request.offset())
        .load(&mut conn)?;

    let saved = match user {
        Some(user) => load_saved_official_ids(&mut conn, user.id)?,
        None => HashSet::new(),
    };

    let items = recipes
        .iter()
        .map(|r| OfficialRecipeSummary::new(r, saved.contains(&r.id)))
        .collect();

    Ok(Json(OfficialRecipePage::from(Page::new(items, total, request))))
}
