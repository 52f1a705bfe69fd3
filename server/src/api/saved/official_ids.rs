use super::load_saved_official_ids;
use crate::api::{ApiError, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SavedOfficialIdsResponse {
    pub ids: Vec<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/saved-community-recipes/official-ids",
    tag = "saved",
    responses(
        (status = 200, description = "Official recipes whose twin is saved", body = SavedOfficialIdsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_saved_official_ids(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;

    let mut ids: Vec<Uuid> = load_saved_official_ids(&mut conn, user.id)?
        .into_iter()
        .collect();
    ids.sort();

    Ok(Json(SavedOfficialIdsResponse { ids }))
}
