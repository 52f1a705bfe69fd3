pub mod get;
pub mod list;

use crate::models::{OfficialRecipe, OfficialStep};
use crate::AppState;
use axum::routing::get;
use axum::Router;
use potluck_core::Page;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Returns the router for the official catalog (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes))
        .route("/{id}", get(get::get_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_recipes, get::get_recipe),
    components(schemas(OfficialRecipeSummary, OfficialRecipeDetail, OfficialRecipePage))
)]
pub struct ApiDoc;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OfficialRecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover_image: Option<String>,
    /// Whether the caller has saved this recipe's community twin
    pub is_saved: bool,
}

impl OfficialRecipeSummary {
    pub fn new(recipe: &OfficialRecipe, is_saved: bool) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            difficulty: recipe.difficulty.clone(),
            time_label: recipe.time_label.clone(),
            cover_image: recipe.cover_image.clone(),
            is_saved,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OfficialRecipeDetail {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover_image: Option<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<OfficialStep>,
    pub is_saved: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OfficialRecipePage {
    pub items: Vec<OfficialRecipeSummary>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl From<Page<OfficialRecipeSummary>> for OfficialRecipePage {
    fn from(page: Page<OfficialRecipeSummary>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total: page.total,
            pages: page.pages,
        }
    }
}
