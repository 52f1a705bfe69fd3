mod api;
mod auth;
mod config;
mod db;
mod media;
mod models;
mod raw_sql;
mod schema;
mod seed;
mod telemetry;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, FromRef, MatchedPath};
use axum::http::Request;
use axum::Router;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Headroom for the multipart framing around an upload.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<db::DbPool>,
    pub media: Arc<dyn MediaStore>,
    pub config: Arc<ServerConfig>,
}

impl FromRef<AppState> for Arc<db::DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<dyn MediaStore> {
    fn from_ref(state: &AppState) -> Self {
        state.media.clone()
    }
}

impl FromRef<AppState> for Arc<ServerConfig> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    let api_router = Router::new()
        .nest("/api/recipes", api::recipes::router())
        .nest("/api/community-recipes", api::community_recipes::router())
        .nest("/api/saved-community-recipes", api::saved::router())
        .nest("/api/shops", api::shops::router())
        .nest("/api/shopping-list", api::shopping_list::router())
        .nest("/api/favorite-items", api::favorite_items::router())
        .nest("/api/item-suggestions", api::suggestions::router());

    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::openapi());

    Router::new()
        .merge(api::public::router())
        .merge(api_router)
        .merge(swagger_ui)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %matched_path,
                    )
                })
                .on_request(|_request: &Request<_>, _span: &Span| {})
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &Span| {
                        let status = response.status().as_u16();
                        if status >= 500 {
                            tracing::error!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request failed with server error"
                            );
                        } else {
                            tracing::info!(
                                status = %status,
                                latency_ms = %latency.as_millis(),
                                "request completed"
                            );
                        }
                    },
                )
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &Span| {
                        tracing::error!(
                            error = %error,
                            latency_ms = %latency.as_millis(),
                            "request failed"
                        );
                    },
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    // Dump the OpenAPI spec and exit
    if args.iter().any(|arg| arg == "--openapi") {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init_telemetry()?;

    let config = ServerConfig::from_env()?;
    let pool = Arc::new(db::create_pool(&config.database_url)?);

    if let Some(path) = flag_value(&args, "--seed-catalog") {
        let inserted = seed::seed_catalog(&pool, &PathBuf::from(&path))?;
        tracing::info!(inserted, path = %path, "Seeded official catalog");
        return Ok(());
    }

    let media = media::create_store(&config).context("Failed to create media store")?;
    tracing::info!(store = media.store_name(), "Media store ready");

    let http_addr = config.http_addr;
    let state = AppState {
        pool,
        media,
        config: Arc::new(config),
    };

    let listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", local_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", local_addr);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_value() {
        let args: Vec<String> = ["potluck-server", "--seed-catalog", "catalog.json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            flag_value(&args, "--seed-catalog"),
            Some("catalog.json".to_string())
        );
        assert_eq!(flag_value(&args, "--openapi"), None);
        assert_eq!(flag_value(&args[..2], "--seed-catalog"), None);
    }
}
