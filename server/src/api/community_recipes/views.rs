use crate::models::{CommunityRecipe, MediaAttachment, Step};
use chrono::{DateTime, Utc};
use potluck_core::Page;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunityRecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover: Option<MediaAttachment>,
    /// Official recipe this one mirrors; null for user-authored recipes
    pub source_recipe_id: Option<Uuid>,
    /// Unrounded mean of all ratings, 0 when unrated
    pub rating_avg: f64,
    pub rating_count: i32,
    /// `rating_avg` rounded half up, kept for older clients
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&CommunityRecipe> for CommunityRecipeSummary {
    fn from(recipe: &CommunityRecipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            difficulty: recipe.difficulty.clone(),
            time_label: recipe.time_label.clone(),
            cover: recipe.cover(),
            source_recipe_id: recipe.source_recipe_id,
            rating_avg: recipe.rating_avg,
            rating_count: recipe.rating_count,
            rating: recipe.rating,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunityRecipeDetail {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub source_recipe_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub time_label: String,
    pub cover: Option<MediaAttachment>,
    pub ingredients: Vec<String>,
    pub steps: Vec<Step>,
    pub rating_avg: f64,
    pub rating_count: i32,
    pub rating: i32,
    /// The caller's own rating; null when anonymous or unrated
    pub my_rating: Option<i16>,
    pub is_saved: bool,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunityRecipeDetail {
    pub fn new(
        recipe: &CommunityRecipe,
        viewer: Option<Uuid>,
        my_rating: Option<i16>,
        is_saved: bool,
    ) -> Self {
        Self {
            id: recipe.id,
            owner_id: recipe.owner_id,
            source_recipe_id: recipe.source_recipe_id,
            title: recipe.title.clone(),
            difficulty: recipe.difficulty.clone(),
            time_label: recipe.time_label.clone(),
            cover: recipe.cover(),
            ingredients: recipe.ingredients(),
            steps: recipe.steps(),
            rating_avg: recipe.rating_avg,
            rating_count: recipe.rating_count,
            rating: recipe.rating,
            my_rating,
            is_saved,
            is_owner: viewer.is_some_and(|id| recipe.is_owned_by(id)),
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// One page of community recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommunityRecipePage {
    pub items: Vec<CommunityRecipeSummary>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl From<Page<CommunityRecipeSummary>> for CommunityRecipePage {
    fn from(page: Page<CommunityRecipeSummary>) -> Self {
        Self {
            items: page.items,
            page: page.page,
            limit: page.limit,
            total: page.total,
            pages: page.pages,
        }
    }
}
