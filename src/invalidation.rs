//! Write-event to cache-tag fan-out.
//!
//! Admin write handlers never know which keys are cached; they name what
//! changed and the fan-out table decides which tags go stale. The table is
//! static data on [`ChangeType`], so it can be unit-tested as a pure
//! mapping, and [`Invalidator`] is the thin async shell that pushes the
//! resulting tags at a backend.
//!
//! Invalidation is monotonic mark-stale: calls are idempotent, commutative,
//! and safe to issue concurrently. A backend failure is logged and
//! swallowed; the database write already succeeded and must not be rolled
//! back over a cache purge, the worst outcome is a stale read until TTL.

use crate::backend::CacheBackend;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::tag::Tag;

/// Entity family targeted by a bulk import or batch edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkKind {
    Clinic,
    Doctor,
    Review,
    Static,
}

/// A write event, as reported by the admin handler that performed it.
///
/// Entity ids and slugs ride along so the entity-specific tags can be
/// derived; a `ClinicChanged` without a slug still fans out to the coarse
/// tags (the record may have been created moments ago and have no cached
/// entity-specific reads yet).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChangeType {
    /// A clinic record was created or edited.
    ClinicChanged { slug: Option<String> },
    /// A doctor record was created or edited.
    DoctorChanged { slug: Option<String> },
    /// A review was created, edited, or moderated.
    ReviewChanged { clinic_id: String },
    /// A clinic's weekly hours changed.
    HoursChanged { clinic_id: String },
    /// A clinic's special hours (date overrides) changed.
    SpecialHoursChanged { clinic_id: String },
    /// A clinic's image gallery changed.
    ClinicImagesChanged { clinic_id: String },
    /// A doctor's image gallery changed.
    DoctorImagesChanged { doctor_id: String },
    /// A clinic's service list changed.
    ServicesChanged { clinic_id: String },
    /// A clinic's category list changed.
    CategoriesChanged { clinic_id: String },
    /// A clinic's moderation status changed.
    ClinicStatusChanged {
        clinic_id: String,
        new_status: String,
    },
    /// A doctor's moderation status changed.
    DoctorStatusChanged {
        doctor_id: String,
        new_status: String,
    },
    /// Site-wide reference data changed.
    StaticDataChanged,
    /// A bulk import or batch edit touched many records of one family.
    Bulk(BulkKind),
}

impl ChangeType {
    /// The tags this change dirties.
    ///
    /// This table is the invalidation contract: every cached read must tag
    /// itself so that the row below covering its data reaches it.
    pub fn tags(&self) -> Vec<Tag> {
        match self {
            ChangeType::ClinicChanged { slug } => {
                let mut tags = vec![
                    Tag::Clinics,
                    Tag::ClinicDetails,
                    Tag::States,
                    Tag::Areas,
                    Tag::Services,
                ];
                if let Some(slug) = slug {
                    tags.push(Tag::Clinic(slug.clone()));
                }
                tags
            }
            ChangeType::DoctorChanged { slug } => {
                let mut tags = vec![Tag::Doctors, Tag::DoctorDetails, Tag::Clinics];
                if let Some(slug) = slug {
                    tags.push(Tag::Doctor(slug.clone()));
                }
                tags
            }
            ChangeType::ReviewChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::ClinicReviews(clinic_id.clone()),
            ],
            ChangeType::HoursChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::ClinicHours(clinic_id.clone()),
            ],
            ChangeType::SpecialHoursChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::ClinicSpecialHours(clinic_id.clone()),
            ],
            ChangeType::ClinicImagesChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::ClinicImages(clinic_id.clone()),
            ],
            ChangeType::DoctorImagesChanged { doctor_id } => vec![
                Tag::Doctors,
                Tag::DoctorDetails,
                Tag::DoctorImages(doctor_id.clone()),
            ],
            ChangeType::ServicesChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::Services,
                Tag::ClinicServices(clinic_id.clone()),
            ],
            ChangeType::CategoriesChanged { clinic_id } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::ClinicCategories(clinic_id.clone()),
            ],
            ChangeType::ClinicStatusChanged {
                clinic_id,
                new_status,
            } => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::States,
                Tag::Areas,
                Tag::Services,
                Tag::ClinicStatus(clinic_id.clone(), new_status.clone()),
            ],
            ChangeType::DoctorStatusChanged {
                doctor_id,
                new_status,
            } => vec![
                Tag::Doctors,
                Tag::DoctorDetails,
                Tag::Clinics,
                Tag::DoctorStatus(doctor_id.clone(), new_status.clone()),
            ],
            ChangeType::StaticDataChanged | ChangeType::Bulk(BulkKind::Static) => vec![
                Tag::StaticData,
                Tag::States,
                Tag::Areas,
                Tag::Services,
            ],
            ChangeType::Bulk(BulkKind::Clinic) => vec![
                Tag::Clinics,
                Tag::ClinicDetails,
                Tag::States,
                Tag::Areas,
            ],
            ChangeType::Bulk(BulkKind::Doctor) => {
                vec![Tag::Doctors, Tag::DoctorDetails, Tag::Clinics]
            }
            ChangeType::Bulk(BulkKind::Review) => vec![Tag::Clinics, Tag::ClinicDetails],
        }
    }
}

/// Pushes a change's tag fan-out at a cache backend.
///
/// `invalidate` has a fire-and-forget contract for callers but completes
/// every backend call before returning, so an admin's next read reflects
/// their write. It never returns an error.
///
/// # Example
///
/// ```no_run
/// use clinic_kit::backend::InMemoryBackend;
/// use clinic_kit::invalidation::{ChangeType, Invalidator};
///
/// # async fn example() {
/// let invalidator = Invalidator::new(InMemoryBackend::new());
///
/// // After a successful clinic update:
/// invalidator
///     .invalidate(ChangeType::ClinicChanged { slug: Some("abc-dental".to_string()) })
///     .await;
/// # }
/// ```
pub struct Invalidator<B: CacheBackend> {
    backend: B,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> Invalidator<B> {
    /// Create a new invalidator over the given backend.
    pub fn new(backend: B) -> Self {
        Invalidator {
            backend,
            metrics: Box::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Invalidate every tag the change dirties.
    ///
    /// Backend failures are logged at warn level and swallowed: stale cache
    /// is a staleness bug, not a correctness bug, and the caller's database
    /// write must not fail over it.
    pub async fn invalidate(&self, change: ChangeType) {
        let tags = change.tags();
        debug!("» Invalidating {} tags for {:?}", tags.len(), change);

        for tag in tags {
            let tag = tag.to_string();
            match self.backend.invalidate_tag(&tag).await {
                Ok(()) => self.metrics.record_invalidation(&tag),
                Err(e) => {
                    warn!("Cache invalidation failed for tag {}: {}", tag, e);
                    self.metrics.record_error(&tag, &e.to_string());
                }
            }
        }
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}
