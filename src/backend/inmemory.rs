//! In-memory cache backend (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! TTL expiration is handled lazily on access. Because the map itself only
//! evicts per key, the backend maintains its own tag-to-keys index to honor
//! `invalidate_tag`.

use super::CacheBackend;
use crate::error::Result;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

/// In-memory cache entry with optional expiration.
struct CacheEntry {
    data: Vec<u8>,
    tags: Vec<String>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, tags: &[String], ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry {
            data,
            tags: tags.to_vec(),
            expires_at,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe async in-memory cache backend with tag invalidation.
///
/// The tag index maps each tag string to the set of keys whose entries
/// carry it. Index entries may reference keys that have since expired or
/// been deleted; that is harmless because invalidation just deletes
/// whatever is still there.
///
/// # Example
///
/// ```no_run
/// use clinic_kit::backend::{InMemoryBackend, CacheBackend};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend
///         .set("clinics:kl", b"page".to_vec(), &["clinics".to_string()], Some(Duration::from_secs(300)))
///         .await?;
///
///     // A clinic write dirties the whole listing family
///     backend.invalidate_tag("clinics").await?;
///     assert!(backend.get("clinics:kl").await?.is_none());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, CacheEntry>>,
    tag_index: Arc<DashMap<String, HashSet<String>>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
            tag_index: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in cache.
    pub async fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Get memory statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_bytes: usize = self.store.iter().map(|entry| entry.data.len()).sum();
        let expired_count = self.store.iter().filter(|entry| entry.is_expired()).count();

        CacheStats {
            total_entries: self.store.len(),
            expired_entries: expired_count,
            tracked_tags: self.tag_index.len(),
            total_bytes,
        }
    }

    /// Print cache statistics to debug log.
    pub async fn log_stats(&self) {
        let stats = self.stats().await;
        debug!(
            "Cache Stats: {} entries ({} expired), {} tags, {} bytes",
            stats.total_entries, stats.expired_entries, stats.tracked_tags, stats.total_bytes
        );
    }

    fn unindex(&self, key: &str, tags: &[String]) {
        for tag in tags {
            if let Some(mut keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
            }
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Check if entry exists and is not expired
        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                debug!("✓ InMemory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Remove expired entry if it exists
        if let Some((_, stale)) = self.store.remove(key) {
            self.unindex(key, &stale.tags);
        }
        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Vec<u8>,
        tags: &[String],
        ttl: Option<Duration>,
    ) -> Result<()> {
        let entry = CacheEntry::new(value, tags, ttl);
        for tag in tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        if let Some(old) = self.store.insert(key.to_string(), entry) {
            // Drop index links the replaced entry held but the new one doesn't
            let kept: HashSet<&String> = tags.iter().collect();
            for tag in old.tags.iter().filter(|t| !kept.contains(t)) {
                if let Some(mut keys) = self.tag_index.get_mut(tag) {
                    keys.remove(key);
                }
            }
        }

        if let Some(d) = ttl {
            debug!("✓ InMemory SET {} tags={:?} (TTL: {:?})", key, tags, d);
        } else {
            debug!("✓ InMemory SET {} tags={:?}", key, tags);
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if let Some((_, entry)) = self.store.remove(key) {
            self.unindex(key, &entry.tags);
        }
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn invalidate_tag(&self, tag: &str) -> Result<()> {
        let keys = match self.tag_index.remove(tag) {
            Some((_, keys)) => keys,
            None => {
                debug!("✓ InMemory INVALIDATE {} -> no entries", tag);
                return Ok(());
            }
        };

        let count = keys.len();
        for key in keys {
            if let Some((_, entry)) = self.store.remove(&key) {
                self.unindex(&key, &entry.tags);
            }
        }

        debug!("✓ InMemory INVALIDATE {} -> {} entries evicted", tag, count);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        if let Some(entry) = self.store.get(key) {
            return Ok(!entry.is_expired());
        }

        Ok(false)
    }

    async fn health_check(&self) -> Result<bool> {
        // In-memory backend is always healthy
        Ok(true)
    }

    async fn clear_all(&self) -> Result<()> {
        self.store.clear();
        self.tag_index.clear();
        warn!("⚠ InMemory CLEAR_ALL executed - all cache cleared!");
        Ok(())
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub tracked_tags: usize,
    pub total_bytes: usize,
}
