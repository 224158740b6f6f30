//! Error types for the directory cache layer.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the cache layer.
///
/// The hours resolver never produces these: malformed schedule rows degrade
/// to "closed" instead of erroring. Everything that can fail lives on the
/// cache side of the crate.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a value to cache bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes back to a value.
    ///
    /// Indicates corrupted or malformed data in the cache.
    ///
    /// **Recovery:** Evict the entry and recompute from the data source.
    DeserializationError(String),

    /// Cache backend error (Redis, in-memory, etc).
    ///
    /// The backend is unavailable or returned an error. Invalidation paths
    /// swallow and log this variant; read paths surface it.
    BackendError(String),

    /// Data source error surfaced by a loader during a read-through fetch.
    ///
    /// Common causes:
    /// - Database connection lost
    /// - Query failure
    ///
    /// **Recovery:** Retry after the source recovers.
    SourceError(String),

    /// Configuration error during backend construction.
    ///
    /// Common causes:
    /// - Invalid connection string
    /// - Invalid pool settings
    ConfigError(String),

    /// Feature not implemented or not enabled.
    ///
    /// Common causes:
    /// - Cargo feature not enabled (e.g., "redis" for RedisBackend)
    /// - Backend-specific operation called on the wrong backend type
    NotImplemented(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    ///
    /// Returned when the magic header is not `b"CLNK"` or the envelope
    /// itself fails to decode.
    ///
    /// **Recovery:** Evict the entry and recompute.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    ///
    /// Raised after a deployment changes the shape of a cached type.
    /// The entry is evicted and recomputed on the next read; no action
    /// needed.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from the cached entry)
        found: u32,
    },

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::SourceError(msg) => write!(f, "Source error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::InvalidCacheEntry(msg) => {
                write!(f, "Invalid cache entry: {}", msg)
            }
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}
