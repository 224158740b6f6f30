//! Cache strategies for read operations.
//!
//! The store takes an explicit strategy per fetch instead of ad-hoc boolean
//! flags. Public directory pages almost always want [`CacheStrategy::Refresh`];
//! admin handlers reach for [`CacheStrategy::Invalidate`] or
//! [`CacheStrategy::Bypass`] right after a write so the author sees their own
//! change.
//!
//! | Strategy | Cache hit | Cache miss | Use case |
//! |----------|-----------|-----------|----------|
//! | **Fresh** | Return | Return None | Data expected cached; miss is acceptable |
//! | **Refresh** | Return | Loader fallback | Default for public reads |
//! | **Invalidate** | Evict, reload | Reload | Immediately after a mutation |
//! | **Bypass** | Ignore | Loader always | Admin previews, testing |

/// Strategy enum controlling cache fetch behavior.
///
/// # Examples
///
/// ```
/// use clinic_kit::strategy::CacheStrategy;
///
/// // Try cache, fall back to the loader
/// let _strategy = CacheStrategy::Refresh;
///
/// // Evict and reload from the loader
/// let _strategy = CacheStrategy::Invalidate;
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Try cache only, no fallback to the loader.
    ///
    /// Flow:
    /// 1. Check cache
    /// 2. If hit: return cached value
    /// 3. If miss: return None (don't run the loader)
    Fresh,

    /// Try cache first, fall back to the loader on miss.
    ///
    /// Flow:
    /// 1. Check cache
    /// 2. If hit: return cached value
    /// 3. If miss: run loader, store result, return it
    #[default]
    Refresh,

    /// Evict the key and reload through the loader.
    ///
    /// Typical use: the first read after an update, when the caller knows
    /// the cached entry is stale.
    Invalidate,

    /// Ignore the cache entirely, always run the loader.
    ///
    /// The result is still stored for other readers.
    Bypass,
}

impl std::fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStrategy::Fresh => write!(f, "Fresh"),
            CacheStrategy::Refresh => write!(f, "Refresh"),
            CacheStrategy::Invalidate => write!(f, "Invalidate"),
            CacheStrategy::Bypass => write!(f, "Bypass"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_display() {
        assert_eq!(CacheStrategy::Fresh.to_string(), "Fresh");
        assert_eq!(CacheStrategy::Refresh.to_string(), "Refresh");
        assert_eq!(CacheStrategy::Invalidate.to_string(), "Invalidate");
        assert_eq!(CacheStrategy::Bypass.to_string(), "Bypass");
    }

    #[test]
    fn test_strategy_default() {
        assert_eq!(CacheStrategy::default(), CacheStrategy::Refresh);
    }
}
