use super::find_owned_recipe;
use crate::api::{ApiError, ApiPath, ErrorResponse};
use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::media::{attach, MediaStore};
use crate::schema::{community_recipe_ratings, community_recipes};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    delete,
    path = "/api/community-recipes/{id}",
    tag = "community_recipes",
    params(
        ("id" = Uuid, Path, description = "Community recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_community_recipe(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    State(media): State<Arc<dyn MediaStore>>,
    State(config): State<Arc<ServerConfig>>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let recipe = {
        let mut conn = pool.get()?;
        let recipe = find_owned_recipe(&mut conn, id, user.id)?;

        conn.transaction::<_, ApiError, _>(|conn| {
            diesel::delete(
                community_recipe_ratings::table
                    .filter(community_recipe_ratings::community_recipe_id.eq(id)),
            )
            .execute(conn)?;
            diesel::delete(community_recipes::table.find(id)).execute(conn)?;
            Ok(())
        })?;

        recipe
    };

    // Saved rows pointing here are left alone; listings skip ids that no
    // longer resolve.
    let attachments = recipe
        .cover()
        .into_iter()
        .chain(recipe.steps().into_iter().filter_map(|s| s.media));
    for attachment in attachments {
        attach::discard(media.as_ref(), &attachment, config.media_timeout).await;
    }

    tracing::info!(recipe_id = %id, "Deleted community recipe");

    Ok(StatusCode::NO_CONTENT)
}
