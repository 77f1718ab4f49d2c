//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /u/{id}`
///
/// # Cache Strategy
///
/// - **Cache hit**: immediate redirect
/// - **Cache miss**: resolve through the service, back-fill the cache in a
///   spawned task
/// - **Cache error**: log and resolve through the service
///
/// Records never change, so a cached entry is correct until it expires.
/// The id is trimmed before both the cache and the store see it, so a padded
/// path shares the cache entry of the bare code.
///
/// # Errors
///
/// Returns 404 Not Found if the code doesn't exist.
pub async fn redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let id = id.trim();

    let original_url = match state.cache.get_url(id).await {
        Ok(Some(cached)) => cached,
        Ok(None) => {
            let url = state.url_service.resolve_short_url(id).await?;

            let cache = state.cache.clone();
            let (id, url_clone) = (id.to_string(), url.clone());
            tokio::spawn(async move {
                if let Err(e) = cache.set_url(&id, &url_clone, None).await {
                    warn!("Failed to cache redirect for {}: {}", id, e);
                }
            });

            url
        }
        Err(e) => {
            warn!("Cache error, falling back to store: {}", e);
            state.url_service.resolve_short_url(id).await?
        }
    };

    debug!(id = %id, "Redirecting");
    Ok(Redirect::temporary(&original_url))
}
