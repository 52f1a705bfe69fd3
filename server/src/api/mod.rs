pub mod community_recipes;
mod error;
mod extract;
pub mod favorite_items;
pub mod public;
pub mod recipes;
pub mod saved;
pub mod shopping_list;
pub mod shops;
pub mod suggestions;

pub use error::{conflict_on_unique, ApiError};
pub use extract::{ApiJson, ApiPath, ApiQuery};

use serde::Serialize;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{OpenApi, ToSchema};

use crate::models::{MediaAttachment, OfficialStep, Step, StepKind};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Plain acknowledgement body
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Build an ILIKE pattern matching `query` anywhere, with LIKE wildcards in
/// the query taken literally.
pub fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Normalized search text, or `None` if there is nothing to search for.
pub fn search_term(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(contains_pattern)
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(components(schemas(
        ErrorResponse,
        OkResponse,
        MediaAttachment,
        OfficialStep,
        Step,
        StepKind
    )))]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    if let Some(components) = spec.components.as_mut() {
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }

    let modules: Vec<utoipa::openapi::OpenApi> = vec![
        public::ApiDoc::openapi(),
        recipes::ApiDoc::openapi(),
        community_recipes::ApiDoc::openapi(),
        saved::ApiDoc::openapi(),
        shops::ApiDoc::openapi(),
        shopping_list::ApiDoc::openapi(),
        favorite_items::ApiDoc::openapi(),
        suggestions::ApiDoc::openapi(),
    ];

    for module_spec in modules {
        spec.paths.paths.extend(module_spec.paths.paths);

        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("soup"), "%soup%");
        assert_eq!(contains_pattern("100%_real"), "%100\\%\\_real%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_search_term_ignores_blank() {
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(Some(" pie ")), Some("%pie%".to_string()));
    }

    #[test]
    fn test_openapi_lists_core_paths() {
        let spec = openapi();
        for path in [
            "/api/community-recipes",
            "/api/community-recipes/ensure-from-recipe/{official_id}",
            "/api/community-recipes/{id}/rate",
            "/api/community-recipes/{id}/my-rating",
            "/api/community-recipes/{id}/steps/{index}/media",
            "/api/saved-community-recipes",
            "/api/saved-community-recipes/official-ids",
            "/api/shops/{id}",
            "/api/item-suggestions",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
