//! Cache backend implementations.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisBackend, RedisConfig};

/// Trait for tag-capable cache backend implementations.
///
/// This is the injected seam between the registry/store and whatever cache
/// service production runs on. A backend stores opaque bytes under a key,
/// remembers which tags the entry carries, and can bulk-invalidate every
/// entry carrying a given tag. Backends whose underlying store only evicts
/// per key (the in-memory one, Redis) keep their own tag-to-keys index to
/// honor `invalidate_tag`.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Implementations should use interior mutability
/// (DashMap, connection pools, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve value from cache by key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Cache miss (key not found or expired)
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs (connection lost, etc.)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store value in cache under the given tags, with optional TTL.
    ///
    /// # Arguments
    /// - `key`: Cache key
    /// - `value`: Serialized entry bytes
    /// - `tags`: Tags the entry carries; `invalidate_tag` on any of them
    ///   evicts this entry
    /// - `ttl`: Time-to-live. None = use backend default or infinite
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        tags: &[String],
        ttl: Option<Duration>,
    ) -> Result<()>;

    /// Remove a single value from cache.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Evict every entry carrying `tag`.
    ///
    /// Marking is monotonic and idempotent: invalidating an already-empty
    /// tag is a no-op, and concurrent calls for the same tag are safe.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn invalidate_tag(&self, tag: &str) -> Result<()>;

    /// Check if key exists in cache (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Health check - verify backend is accessible.
    ///
    /// Used for readiness probes, circuit breakers, etc.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Clear all cache (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if operation is not implemented or fails
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::NotImplemented(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
