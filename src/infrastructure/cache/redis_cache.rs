//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

const KEY_PREFIX: &str = "url:";

/// Redis cache for redirect lookups.
///
/// `ConnectionManager` reconnects transparently and is cheap to clone per
/// call. All operations are fail-open: errors are logged and reported as
/// misses or successful no-ops.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL used when [`CacheService::set_url`] gets `None`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }
}

fn build_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, id: &str) -> CacheResult<Option<String>> {
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(build_key(id)).await {
            Ok(Some(url)) => {
                debug!("Cache HIT: {}", id);
                Ok(Some(url))
            }
            Ok(None) => {
                debug!("Cache MISS: {}", id);
                Ok(None)
            }
            Err(e) => {
                error!("Redis GET error for {}: {}", id, e);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        id: &str,
        original_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        match conn.set_ex::<_, _, ()>(build_key(id), original_url, ttl).await {
            Ok(()) => {
                debug!("Cache SET: {} (TTL: {}s)", id, ttl);
                Ok(())
            }
            Err(e) => {
                warn!("Redis SET error for {}: {}", id, e);
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_is_namespaced() {
        assert_eq!(build_key("HkTRTCTy"), "url:HkTRTCTy");
    }
}
