//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /u`       - Shorten a URL
//! - `GET  /u/{id}`  - Short URL redirect
//! - `GET  /health`  - Health check: storage, cache
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with every route and the tracing layer.
///
/// Exposed separately from [`app_router`] so tests can drive it directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/u", api::routes::url_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application service: [`router`] wrapped in trailing-slash
/// normalization, which must run before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
