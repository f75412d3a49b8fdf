//! Route configuration and setup

use crate::constants::{API_PREFIX, MAX_CONCURRENT_IMPORTS, MULTIPART_OVERHEAD_BYTES};
use crate::handlers::{health, import};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use colabdocs_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Oversized bodies surface as a multipart error with status 413, which the
    // upload helper turns into a JSON error response.
    let body_limit = config
        .max_archive_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    tracing::info!(
        max_archive_mb = config.max_archive_size_bytes() / 1024 / 1024,
        max_concurrent_imports = MAX_CONCURRENT_IMPORTS,
        "Import route configured"
    );

    let api_routes = Router::new()
        .route(
            "/colaboradores/import",
            post(import::import_collaborators)
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_IMPORTS)),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .nest(API_PREFIX, api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
