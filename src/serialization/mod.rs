//! Postcard-based cache serialization with versioned envelopes.
//!
//! Every cached value is wrapped in a small envelope before it reaches a
//! backend:
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "CLNK"              u32 (LE)           postcard::to_allocvec(T)
//! ```
//!
//! The magic rejects foreign or corrupted entries; the version forces
//! eviction instead of silent misreads when a cached type's shape changes
//! between deployments. Same value in, same bytes out, always.
//!
//! # Example
//!
//! ```rust
//! use clinic_kit::serialization::{serialize_for_cache, deserialize_from_cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Listing {
//!     slug: String,
//!     name: String,
//! }
//!
//! # fn main() -> clinic_kit::Result<()> {
//! let listing = Listing { slug: "abc-dental".to_string(), name: "ABC Dental".to_string() };
//!
//! let bytes = serialize_for_cache(&listing)?;
//! let back: Listing = deserialize_from_cache(&bytes)?;
//! assert_eq!(listing, back);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Magic header for clinic-kit cache entries: b"CLNK"
pub const CACHE_MAGIC: [u8; 4] = *b"CLNK";

/// Current schema version.
///
/// Increment when making breaking changes to cached types: adding, removing
/// or reordering fields, changing field types, changing enum variants. Old
/// entries are then evicted and recomputed on next access.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope for cache entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    /// Magic header: must be b"CLNK"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The actual cached data
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Create a new envelope with the current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for cache storage.
///
/// This is the canonical way bytes enter a backend; every backend stores
/// exactly what this function returns.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Deserialize a value from cache storage with validation.
///
/// Validates the magic header and schema version before handing back the
/// payload. Callers treat the two validation errors as "evict and
/// recompute", not as fatal.
///
/// # Errors
///
/// - `Error::InvalidCacheEntry`: invalid magic header
/// - `Error::VersionMismatch`: schema version mismatch
/// - `Error::DeserializationError`: corrupted Postcard payload
pub fn deserialize_from_cache<'de, T: Deserialize<'de>>(bytes: &'de [u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        log::error!("Cache deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != CACHE_MAGIC {
        log::warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC,
            envelope.magic
        );
        return Err(Error::InvalidCacheEntry(format!(
            "Invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION,
            envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
    struct TestListing {
        slug: String,
        open_now: bool,
    }

    fn listing() -> TestListing {
        TestListing {
            slug: "abc-dental".to_string(),
            open_now: true,
        }
    }

    #[test]
    fn test_roundtrip() {
        let bytes = serialize_for_cache(&listing()).unwrap();
        let back: TestListing = deserialize_from_cache(&bytes).unwrap();
        assert_eq!(back, listing());
    }

    #[test]
    fn test_envelope_starts_with_magic() {
        let bytes = serialize_for_cache(&listing()).unwrap();
        assert_eq!(&bytes[0..4], b"CLNK");
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let a = serialize_for_cache(&listing()).unwrap();
        let b = serialize_for_cache(&listing()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_magic_rejected() {
        let mut bytes = serialize_for_cache(&listing()).unwrap();
        bytes[0] = b'X';
        let result: Result<TestListing> = deserialize_from_cache(&bytes);
        assert!(matches!(result, Err(Error::InvalidCacheEntry(_))));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let envelope = CacheEnvelope {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION + 1,
            payload: listing(),
        };
        let bytes = postcard::to_allocvec(&envelope).unwrap();
        let result: Result<TestListing> = deserialize_from_cache(&bytes);
        assert!(matches!(
            result,
            Err(Error::VersionMismatch { expected: 1, found: 2 })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        let result: Result<TestListing> = deserialize_from_cache(&[0xFF, 0x00, 0x13]);
        assert!(result.is_err());
    }
}
