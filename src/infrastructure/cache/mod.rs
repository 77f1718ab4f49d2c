//! Read-through cache for redirects.
//!
//! Records never change after creation, so a cached id -> URL mapping can only
//! go stale by expiring. Provides a [`CacheService`] trait with two
//! implementations:
//! - [`RedisCache`] - Redis-backed cache
//! - [`NullCache`] - No-op implementation when Redis is not configured

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
