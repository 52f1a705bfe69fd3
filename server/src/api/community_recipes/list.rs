use super::views::{CommunityRecipePage, CommunityRecipeSummary};
use crate::api::{search_term, ApiError, ApiQuery, ErrorResponse};
use crate::db::DbPool;
use crate::models::CommunityRecipe;
use crate::raw_sql::difficulty_rank;
use crate::schema::community_recipes;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use potluck_core::{Page, PageRequest, SortMode};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCommunityRecipesParams {
    /// 1-indexed page (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 12, max: 50)
    pub limit: Option<i64>,
    /// Case-insensitive title substring
    pub q: Option<String>,
    /// newest (default), top / favorite / rating, or easiest
    pub sort: Option<String>,
    /// Include twins of official recipes (default: false)
    #[serde(default, alias = "includeDerived")]
    pub include_derived: bool,
}

/// Filters shared by the count and the page query.
fn filtered<'a>(
    pattern: Option<&'a str>,
    include_derived: bool,
) -> community_recipes::BoxedQuery<'a, Pg> {
    let mut query = community_recipes::table.into_boxed();

    if !include_derived {
        query = query.filter(community_recipes::source_recipe_id.is_null());
    }
    if let Some(pattern) = pattern {
        query = query.filter(community_recipes::title.ilike(pattern));
    }

    query
}

#[utoipa::path(
    get,
    path = "/api/community-recipes",
    tag = "community_recipes",
    params(ListCommunityRecipesParams),
    responses(
        (status = 200, description = "One page of community recipes", body = CommunityRecipePage),
        (status = 400, description = "Invalid parameters", body = ErrorResponse)
    )
)]
pub async fn list_community_recipes(
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<ListCommunityRecipesParams>,
) -> Result<impl IntoResponse, ApiError> {
    let sort: SortMode = params.sort.as_deref().unwrap_or_default().parse()?;
    let request = PageRequest::new(params.page, params.limit);
    let pattern = search_term(params.q.as_deref());

    let mut conn = pool.get()?;

    let total: i64 = filtered(pattern.as_deref(), params.include_derived)
        .count()
        .get_result(&mut conn)?;

    let query = filtered(pattern.as_deref(), params.include_derived);
    let query = match sort {
        SortMode::Newest => query.order((
            community_recipes::created_at.desc(),
            community_recipes::id.desc(),
        )),
        SortMode::TopRated => query.order((
            community_recipes::rating_avg.desc(),
            community_recipes::rating_count.desc(),
            community_recipes::created_at.desc(),
            community_recipes::id.desc(),
        )),
        SortMode::Easiest => query
            .order(difficulty_rank())
            .then_order_by(community_recipes::created_at.desc())
            .then_order_by(community_recipes::id.desc()),
    };

    let recipes: Vec<CommunityRecipe> = query
        .select(CommunityRecipe::as_select())
        .limit(request.limit)
        .offset(request.offset())
        .load(&mut conn)?;

    let items = recipes.iter().map(CommunityRecipeSummary::from).collect();
    Ok(Json(CommunityRecipePage::from(Page::new(
        items, total, request,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn params(uri: &'static str) -> ListCommunityRecipesParams {
        let Query(params) = Query::try_from_uri(&Uri::from_static(uri)).unwrap();
        params
    }

    #[test]
    fn test_derived_recipes_excluded_by_default() {
        assert!(!params("/api/community-recipes?sort=top").include_derived);
    }

    #[test]
    fn test_include_derived_accepts_either_casing() {
        assert!(params("/api/community-recipes?include_derived=true").include_derived);
        assert!(params("/api/community-recipes?includeDerived=true").include_derived);
    }
}
