//! Observability hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to feed cache hit/miss/invalidation counts
//! into your monitoring system:
//!
//! ```ignore
//! use clinic_kit::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! // let store = CacheStore::new(backend).with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Default behavior (if not overridden) logs via the `log` crate.

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a tag invalidation.
    fn record_invalidation(&self, tag: &str) {
        debug!("Cache INVALIDATE: {}", tag);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_invalidation(&self, _tag: &str) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
