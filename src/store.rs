//! Read-through cache store - main entry point for cached reads.
//!
//! Public page handlers compute a key with [`crate::key::CacheKeyBuilder`],
//! describe the read with [`ReadOptions`] (volatility class plus the tags a
//! later write must be able to reach it by), and hand the store an async
//! loader that knows how to fetch from the data source. The store consults
//! the backend, falls back to the loader on a miss, and re-caches the result
//! under the same key and tags.

use crate::backend::CacheBackend;
use crate::error::Result;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use crate::strategy::CacheStrategy;
use crate::tag::{Tag, Volatility};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};

/// Per-read caching parameters.
///
/// # Example
///
/// ```
/// use clinic_kit::store::ReadOptions;
/// use clinic_kit::tag::{Tag, Volatility};
///
/// let options = ReadOptions::new(Volatility::SemiStatic)
///     .with_tag(Tag::Clinics)
///     .with_tag(Tag::Clinic("abc-dental".to_string()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReadOptions {
    /// Volatility class; decides the default TTL and contributes its own tag.
    pub volatility: Volatility,
    /// Tags a write must be able to invalidate this read by.
    pub tags: Vec<Tag>,
    /// Override the class TTL for this read only.
    pub ttl_override: Option<Duration>,
}

impl ReadOptions {
    /// Options for the given volatility class, with no tags yet.
    pub fn new(volatility: Volatility) -> Self {
        ReadOptions {
            volatility,
            tags: Vec::new(),
            ttl_override: None,
        }
    }

    /// Attach a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Attach several tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Override TTL for this read.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_override = Some(ttl);
        self
    }

    /// Effective TTL: the override if set, else the class default.
    fn ttl(&self) -> Duration {
        self.ttl_override.unwrap_or_else(|| self.volatility.ttl())
    }

    /// Rendered tag strings, including the volatility-class tag.
    fn tag_strings(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.tags.iter().map(|t| t.to_string()).collect();
        tags.push(self.volatility.tag().to_string());
        tags
    }
}

/// Read-through cache store over a tag-capable backend.
///
/// Cheap to construct per handler if the backend handle is cloned in; the
/// backends themselves share state through `Arc` internally.
///
/// # Example
///
/// ```ignore
/// use clinic_kit::{CacheStore, CacheStrategy, ReadOptions};
/// use clinic_kit::backend::InMemoryBackend;
/// use clinic_kit::key::CacheKeyBuilder;
/// use clinic_kit::tag::{Tag, Volatility};
///
/// let store = CacheStore::new(InMemoryBackend::new());
/// let key = CacheKeyBuilder::build("clinic-listings", &[Some("approved")]);
/// let options = ReadOptions::new(Volatility::SemiStatic).with_tag(Tag::Clinics);
///
/// let listings: Option<Vec<Listing>> = store
///     .fetch(&key, &options, CacheStrategy::Refresh, || async {
///         db.approved_listings().await
///     })
///     .await?;
/// ```
pub struct CacheStore<B: CacheBackend> {
    backend: B,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> CacheStore<B> {
    /// Create a new store with the given backend.
    pub fn new(backend: B) -> Self {
        CacheStore {
            backend,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Execute a cached read.
    ///
    /// The loader runs only when the strategy requires it; `Ok(None)` from
    /// the loader means the entity does not exist and nothing is cached.
    ///
    /// # Errors
    ///
    /// - `Error::DeserializationError` / `Error::InvalidCacheEntry` /
    ///   `Error::VersionMismatch`: the cached entry could not be decoded.
    ///   Distinct from a miss so callers can decide to evict.
    /// - `Error::SerializationError`: the loaded value could not be encoded.
    /// - `Error::BackendError`: the backend failed on the read path. A
    ///   failed `set` after a successful load is logged and swallowed
    ///   instead, so a cache outage degrades to uncached reads.
    /// - `Error::SourceError` (or whatever the loader returns): the data
    ///   source failed.
    pub async fn fetch<T, L, Fut>(
        &self,
        key: &str,
        options: &ReadOptions,
        strategy: CacheStrategy,
        loader: L,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        L: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let timer = Instant::now();
        debug!("» Cache fetch for key: {} (strategy: {})", key, strategy);

        let result = match strategy {
            CacheStrategy::Fresh => self.read_cached::<T>(key).await,
            CacheStrategy::Refresh => match self.read_cached::<T>(key).await {
                Ok(Some(value)) => Ok(Some(value)),
                Ok(None) => self.load_and_store(key, options, loader).await,
                Err(e) => Err(e),
            },
            CacheStrategy::Invalidate => {
                self.backend.delete(key).await?;
                debug!("✓ Cache evicted for {}", key);
                self.load_and_store(key, options, loader).await
            }
            CacheStrategy::Bypass => self.load_and_store(key, options, loader).await,
        };

        match &result {
            Ok(Some(_)) => self.metrics.record_hit(key, timer.elapsed()),
            Ok(None) => self.metrics.record_miss(key, timer.elapsed()),
            Err(e) => self.metrics.record_error(key, &e.to_string()),
        }

        result
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key).await? {
            Some(bytes) => deserialize_from_cache(&bytes).map(Some),
            None => Ok(None),
        }
    }

    async fn load_and_store<T, L, Fut>(
        &self,
        key: &str,
        options: &ReadOptions,
        loader: L,
    ) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        L: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        match loader().await? {
            Some(value) => {
                let bytes = serialize_for_cache(&value)?;
                let tags = options.tag_strings();
                if let Err(e) = self.backend.set(key, bytes, &tags, Some(options.ttl())).await {
                    // Stale-free but uncached beats failing the page render
                    warn!("Cache set failed for {} after load: {}", key, e);
                }
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}
