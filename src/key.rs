//! Cache key management utilities.
//!
//! Keys are built from an ordered list of parts joined by a fixed separator,
//! so two reads with the same logical parameters always land on the same
//! cache entry. Optional parts that are absent (no `status` filter, no
//! pagination) are omitted entirely rather than rendered as placeholders.

/// Separator between key parts.
pub const KEY_SEPARATOR: char = ':';

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Build a cache key from a prefix and ordered parts, skipping `None`.
    ///
    /// Callers must pass parts in a consistent order: the builder joins them
    /// as given and does not sort, so `["approved", "page-2"]` and
    /// `["page-2", "approved"]` are different keys.
    ///
    /// # Example
    ///
    /// ```
    /// use clinic_kit::key::CacheKeyBuilder;
    ///
    /// let key = CacheKeyBuilder::build("clinic-listings", &[Some("approved"), None, Some("2")]);
    /// assert_eq!(key, "clinic-listings:approved:2");
    ///
    /// let unfiltered = CacheKeyBuilder::build("clinic-listings", &[None]);
    /// assert_eq!(unfiltered, "clinic-listings");
    /// ```
    pub fn build(prefix: &str, parts: &[Option<&str>]) -> String {
        let mut key = String::from(prefix);
        for part in parts.iter().flatten() {
            key.push(KEY_SEPARATOR);
            key.push_str(part);
        }
        key
    }

    /// Build a key from parts that are all present.
    pub fn build_composite(parts: &[&str]) -> String {
        parts.join(&KEY_SEPARATOR.to_string())
    }

    /// Parse a composite key into parts.
    pub fn parse(key: &str) -> Vec<&str> {
        key.split(KEY_SEPARATOR).collect()
    }
}
