use super::views::CommunityRecipeDetail;
use crate::api::{ApiError, ApiJson, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{CommunityRecipe, NewCommunityRecipe, Step, StepKind};
use crate::schema::community_recipes;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use potluck_core::Difficulty;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStepRequest {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCommunityRecipeRequest {
    pub title: String,
    /// Beginner, Intermediate or Hard
    pub difficulty: String,
    /// Free-form, e.g. "45 min"
    #[serde(default)]
    pub time_label: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Steps start as text; attach media with the step media endpoint
    #[serde(default)]
    pub steps: Vec<CreateStepRequest>,
}

impl CreateCommunityRecipeRequest {
    fn into_new_recipe(
        self,
        owner_id: uuid::Uuid,
    ) -> Result<NewCommunityRecipe, ApiError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("Title is required".to_string()));
        }
        let difficulty: Difficulty = self.difficulty.parse()?;

        let ingredients: Vec<String> = self
            .ingredients
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect();
        let steps: Vec<Step> = self
            .steps
            .into_iter()
            .map(|s| Step {
                kind: StepKind::Text,
                media: None,
                description: s.description,
            })
            .collect();

        Ok(NewCommunityRecipe {
            owner_id: Some(owner_id),
            source_recipe_id: None,
            title: title.to_string(),
            difficulty: difficulty.as_str().to_string(),
            time_label: self.time_label.trim().to_string(),
            cover: None,
            ingredients: serde_json::to_value(&ingredients)?,
            steps: serde_json::to_value(&steps)?,
        })
    }
}

#[utoipa::path(
    post,
    path = "/api/community-recipes",
    tag = "community_recipes",
    request_body = CreateCommunityRecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = CommunityRecipeDetail),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_community_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<CreateCommunityRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_recipe = req.into_new_recipe(user.id)?;

    let mut conn = pool.get()?;
    let recipe: CommunityRecipe = diesel::insert_into(community_recipes::table)
        .values(&new_recipe)
        .returning(CommunityRecipe::as_returning())
        .get_result(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(CommunityRecipeDetail::new(&recipe, Some(user.id), None, false)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn request(title: &str, difficulty: &str) -> CreateCommunityRecipeRequest {
        CreateCommunityRecipeRequest {
            title: title.to_string(),
            difficulty: difficulty.to_string(),
            time_label: " 20 min ".to_string(),
            ingredients: vec!["flour".to_string(), "  ".to_string()],
            steps: vec![CreateStepRequest {
                description: "Mix".to_string(),
            }],
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let owner = Uuid::new_v4();
        let new_recipe = request(" Pancakes ", "beginner")
            .into_new_recipe(owner)
            .unwrap();

        assert_eq!(new_recipe.owner_id, Some(owner));
        assert_eq!(new_recipe.source_recipe_id, None);
        assert_eq!(new_recipe.title, "Pancakes");
        assert_eq!(new_recipe.difficulty, "Beginner");
        assert_eq!(new_recipe.time_label, "20 min");
        assert_eq!(new_recipe.ingredients, json!(["flour"]));
        assert_eq!(
            new_recipe.steps,
            json!([{"kind": "text", "media": null, "description": "Mix"}])
        );
    }

    #[test]
    fn test_rejects_unknown_difficulty_and_blank_title() {
        let owner = Uuid::new_v4();
        assert!(matches!(
            request("Pancakes", "Expert").into_new_recipe(owner),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            request("  ", "Hard").into_new_recipe(owner),
            Err(ApiError::Validation(_))
        ));
    }
}
