use super::load_suggestions;
use crate::api::{ApiError, ApiQuery, ErrorResponse};
use crate::auth::AuthUser;
use crate::db::DbPool;
use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SuggestionsParams {
    /// Case-insensitive substring; all suggestions when absent
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuggestionsResponse {
    pub items: Vec<String>,
}

#[utoipa::path(
    get,
    path = "/api/item-suggestions",
    tag = "shopping_list",
    params(SuggestionsParams),
    responses(
        (status = 200, description = "Previously entered item texts", body = SuggestionsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_suggestions(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    ApiQuery(params): ApiQuery<SuggestionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let suggestions = load_suggestions(&mut conn, user.id)?;

    let items = suggestions.matching(params.q.as_deref().unwrap_or_default());

    Ok(Json(SuggestionsResponse { items }))
}
