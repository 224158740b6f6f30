//! # clinic-kit
//!
//! Business-hours resolution and tag-based cache invalidation for clinic
//! directory platforms.
//!
//! ## Features
//!
//! - **Hours Resolver:** Pure `is_open` / `next_opening_time` over weekly
//!   shifts and date-specific overrides, resilient to malformed rows
//! - **Closed Tag Vocabulary:** Cache tags are an enum, not strings, so a
//!   typo cannot silently break invalidation fan-out
//! - **Fan-out Table:** One static mapping from "what changed" to "which
//!   tags go stale", unit-testable as a pure function
//! - **Backend Agnostic:** In-memory backend by default, Redis behind a
//!   feature flag, or bring your own tag-capable backend
//! - **Read-Through Store:** Key building, envelope serialization,
//!   volatility-class TTLs, and loader fallback in one call
//!
//! ## Quick Start
//!
//! ```ignore
//! use clinic_kit::{
//!     CacheStore, CacheStrategy, ChangeType, Invalidator, ReadOptions,
//!     backend::InMemoryBackend,
//!     key::CacheKeyBuilder,
//!     tag::{Tag, Volatility},
//! };
//!
//! let backend = InMemoryBackend::new();
//! let store = CacheStore::new(backend.clone());
//! let invalidator = Invalidator::new(backend);
//!
//! // Public read path
//! let key = CacheKeyBuilder::build("clinic-listings", &[Some("approved")]);
//! let options = ReadOptions::new(Volatility::SemiStatic).with_tag(Tag::Clinics);
//! let listings = store
//!     .fetch(&key, &options, CacheStrategy::Refresh, || async {
//!         db.approved_listings().await
//!     })
//!     .await?;
//!
//! // Admin write path, after the database mutation committed
//! invalidator
//!     .invalidate(ChangeType::ClinicChanged { slug: Some("abc-dental".into()) })
//!     .await;
//! ```
//!
//! ## Hours Resolution
//!
//! ```
//! use chrono::NaiveDate;
//! use clinic_kit::resolver::{is_open, next_opening_time};
//! use clinic_kit::schedule::WeeklyHours;
//!
//! // Mondays 09:00-17:00
//! let weekly = vec![WeeklyHours::new(1, "09:00", "17:00")];
//! let monday_morning = NaiveDate::from_ymd_opt(2025, 6, 2)
//!     .unwrap()
//!     .and_hms_opt(10, 0, 0)
//!     .unwrap();
//!
//! assert!(is_open(&weekly, &[], monday_morning));
//! assert!(next_opening_time(&weekly, &[], monday_morning).is_some());
//! ```
//!
//! All timestamps are assumed to already be in the location's local time
//! zone; the crate performs no zone conversion.

#[macro_use]
extern crate log;

pub mod backend;
pub mod error;
pub mod invalidation;
pub mod key;
pub mod observability;
pub mod resolver;
pub mod schedule;
pub mod serialization;
pub mod store;
pub mod strategy;
pub mod tag;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use error::{Error, Result};
pub use invalidation::{BulkKind, ChangeType, Invalidator};
pub use key::CacheKeyBuilder;
pub use resolver::{is_open, next_opening_time};
pub use schedule::{DateOverride, WeeklyHours};
pub use store::{CacheStore, ReadOptions};
pub use strategy::CacheStrategy;
pub use tag::{Tag, Volatility};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
