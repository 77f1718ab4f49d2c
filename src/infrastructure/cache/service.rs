//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of short code -> original URL mappings.
///
/// Implementations must be thread-safe and fail open: a broken cache degrades
/// redirects to store reads, it never fails them.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the original URL for a short code.
    ///
    /// Returns `Ok(None)` on a miss. Production implementations also return
    /// `Ok(None)` on backend errors after logging them.
    async fn get_url(&self, id: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping. `ttl_seconds = None` uses the implementation default.
    async fn set_url(&self, id: &str, original_url: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Reports whether the backend is reachable. Used by the health check.
    async fn health_check(&self) -> bool;

    /// Short label for health output.
    fn backend(&self) -> &'static str;
}
