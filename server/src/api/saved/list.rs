use super::load_saved_set;
use crate::api::community_recipes::views::{CommunityRecipePage, CommunityRecipeSummary};
use crate::api::{ApiError, ApiQuery, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::CommunityRecipe;
use crate::schema::community_recipes;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use potluck_core::{sort_recipes, Page, PageRequest, SortMode};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListSavedParams {
    /// 1-indexed page (default: 1)
    pub page: Option<i64>,
    /// Page size (default: 12, max: 50)
    pub limit: Option<i64>,
    /// newest (default), top / favorite / rating, or easiest
    pub sort: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/saved-community-recipes",
    tag = "saved",
    params(ListSavedParams),
    responses(
        (status = 200, description = "One page of saved recipes", body = CommunityRecipePage),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_saved(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<ListSavedParams>,
) -> Result<impl IntoResponse, ApiError> {
    let sort: SortMode = params.sort.as_deref().unwrap_or_default().parse()?;
    let request = PageRequest::new(params.page, params.limit);

    let mut conn = pool.get()?;
    let saved = load_saved_set(&mut conn, user.id)?;

    let mut recipes: Vec<CommunityRecipe> = if saved.is_empty() {
        Vec::new()
    } else {
        community_recipes::table
            .filter(community_recipes::id.eq_any(saved.ids().to_vec()))
            .select(CommunityRecipe::as_select())
            .load(&mut conn)?
    };

    sort_recipes(&mut recipes, sort);

    let page = Page::from_all(recipes, request).map(|r| CommunityRecipeSummary::from(&r));
    Ok(Json(CommunityRecipePage::from(page)))
}
