use crate::api::{ApiError, ApiJson, ErrorResponse, OkResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::NewSavedRecipe;
use crate::schema::{community_recipes, saved_community_recipes};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::ExecuteDsl;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveRecipeRequest {
    /// Community recipe ID (for official recipes, ensure the twin first)
    #[serde(alias = "recipeId")]
    pub recipe_id: Uuid,
}

/// Saving twice leaves the single (user, recipe) row in place.
fn insert_saved(
    saved: NewSavedRecipe,
) -> impl ExecuteDsl<PgConnection> + RunQueryDsl<PgConnection> + QueryFragment<Pg> {
    diesel::insert_into(saved_community_recipes::table)
        .values(saved)
        .on_conflict_do_nothing()
}

#[utoipa::path(
    post,
    path = "/api/saved-community-recipes",
    tag = "saved",
    request_body = SaveRecipeRequest,
    responses(
        (status = 201, description = "Recipe is saved (saving twice is a no-op)", body = OkResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiJson(req): ApiJson<SaveRecipeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let exists: bool = diesel::select(diesel::dsl::exists(
        community_recipes::table.find(req.recipe_id),
    ))
    .get_result(&mut conn)?;
    if !exists {
        return Err(ApiError::not_found("Community recipe"));
    }

    insert_saved(NewSavedRecipe {
        user_id: user.id,
        community_recipe_id: req.recipe_id,
    })
    .execute(&mut conn)?;

    Ok((StatusCode::CREATED, Json(OkResponse::ok())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saving_twice_is_a_no_op() {
        let saved = NewSavedRecipe {
            user_id: Uuid::new_v4(),
            community_recipe_id: Uuid::new_v4(),
        };

        let sql = diesel::debug_query::<Pg, _>(&insert_saved(saved)).to_string();
        assert!(sql.contains("ON CONFLICT DO NOTHING"), "{}", sql);
    }

    #[test]
    fn test_accepts_camel_case_recipe_id() {
        let id = Uuid::new_v4();
        let req: SaveRecipeRequest =
            serde_json::from_value(serde_json::json!({ "recipeId": id })).unwrap();
        assert_eq!(req.recipe_id, id);

        let req: SaveRecipeRequest =
            serde_json::from_value(serde_json::json!({ "recipe_id": id })).unwrap();
        assert_eq!(req.recipe_id, id);
    }
}
