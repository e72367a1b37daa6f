//! Nuit API server library.
//!
//! Exposes the router so the binary and the integration tests build the same
//! application.
pub mod config;
pub mod download;
pub mod error;
pub mod filename;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use nuit_downloader::VideoResolver;

/// Shared application state for all API handlers.
pub struct AppState {
    pub resolver: Arc<dyn VideoResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<dyn VideoResolver>) -> Self {
        Self { resolver }
    }
}

/// Build the API router. When `static_dir` is given, the download page is
/// served from it for every path the API does not claim.
pub fn router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route("/api/download", get(routes::download))
        .route("/api/health", get(routes::health));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
