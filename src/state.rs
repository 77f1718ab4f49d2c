//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::CacheService;

/// Handler state. Cloned per request; every field is reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService<dyn UrlRepository>>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        url_service: Arc<UrlService<dyn UrlRepository>>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self { url_service, cache }
    }
}
