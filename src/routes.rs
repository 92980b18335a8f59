//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`          - Landing page (`views/index.html`)
//! - `GET  /health`    - Health check
//! - `/api/*`          - Short url API
//! - `/public/*`       - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may call the API
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Builds the application routes without path normalization.
///
/// Static files are resolved relative to the working directory.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route_service("/", ServeFile::new("views/index.html"))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes())
        .nest_service("/public", ServeDir::new("public"))
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(app_routes(state))
}
