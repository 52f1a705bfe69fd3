use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::models::{CommunityRecipe, NewCommunityRecipe, OfficialRecipe};
use crate::schema::{community_recipes, recipes};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::LoadQuery;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnsureTwinResponse {
    /// Community recipe mirroring the official one
    pub id: Uuid,
    pub rating_avg: f64,
    pub rating_count: i32,
}

/// Insert a twin unless one already mirrors the same official recipe.
/// Yields no row when the unique `source_recipe_id` already exists.
fn insert_twin(
    twin: NewCommunityRecipe,
) -> impl RunQueryDsl<PgConnection>
       + for<'q> LoadQuery<'q, PgConnection, CommunityRecipe>
       + QueryFragment<Pg> {
    diesel::insert_into(community_recipes::table)
        .values(twin)
        .on_conflict(community_recipes::source_recipe_id)
        .do_nothing()
        .returning(CommunityRecipe::as_returning())
}

/// Get or create the community twin of an official recipe.
///
/// Returns the twin and whether this call created it. The unique index on
/// `source_recipe_id` makes concurrent calls converge on one row.
pub fn ensure_twin(
    conn: &mut PgConnection,
    official_id: Uuid,
) -> Result<(CommunityRecipe, bool), ApiError> {
    let official: OfficialRecipe = recipes::table
        .find(official_id)
        .select(OfficialRecipe::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| ApiError::not_found("Recipe"))?;

    let inserted: Option<CommunityRecipe> = insert_twin(NewCommunityRecipe::twin_of(&official)?)
        .get_result(conn)
        .optional()?;

    if let Some(twin) = inserted {
        tracing::info!(official_id = %official_id, twin_id = %twin.id, "Created community twin");
        return Ok((twin, true));
    }

    let existing = community_recipes::table
        .filter(community_recipes::source_recipe_id.eq(official_id))
        .select(CommunityRecipe::as_select())
        .first(conn)?;

    Ok((existing, false))
}

#[utoipa::path(
    post,
    path = "/api/community-recipes/ensure-from-recipe/{official_id}",
    tag = "community_recipes",
    params(
        ("official_id" = Uuid, Path, description = "Official recipe ID")
    ),
    responses(
        (status = 200, description = "Twin already existed", body = EnsureTwinResponse),
        (status = 201, description = "Twin created", body = EnsureTwinResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Official recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn ensure_from_recipe(
    AuthUser(_user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiPath(official_id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let (twin, created) = ensure_twin(&mut conn, official_id)?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(EnsureTwinResponse {
            id: twin.id,
            rating_avg: twin.rating_avg,
            rating_count: twin.rating_count,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_twin_insert_converges_on_source_recipe_id() {
        let official_id = Uuid::new_v4();
        let twin = NewCommunityRecipe {
            owner_id: None,
            source_recipe_id: Some(official_id),
            title: "Ramen".to_string(),
            difficulty: "Hard".to_string(),
            time_label: "2 h".to_string(),
            cover: None,
            ingredients: json!([]),
            steps: json!([]),
        };

        let sql = diesel::debug_query::<Pg, _>(&insert_twin(twin)).to_string();
        assert!(
            sql.contains(r#"ON CONFLICT ("source_recipe_id") DO NOTHING"#),
            "{}",
            sql
        );
        assert!(sql.contains("RETURNING"), "{}", sql);
    }
}
