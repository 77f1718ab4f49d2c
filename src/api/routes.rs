//! Short URL route configuration.

use crate::api::handlers::{create_handler, redirect_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short URL routes, nested under `/u` by the top-level router.
///
/// # Endpoints
///
/// - `POST /`     - Shorten a URL
/// - `GET  /{id}` - Redirect to the original URL
pub fn url_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_handler))
        .route("/{id}", get(redirect_handler))
}
