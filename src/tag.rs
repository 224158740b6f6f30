//! Cache tag vocabulary and volatility classes.
//!
//! Tags are the unit of bulk invalidation: every cached read carries a set
//! of them, and a write names the tags it dirties without knowing which
//! specific keys are cached. The vocabulary is a closed enum rather than
//! bare strings so a typo in a writer cannot silently miss the entries a
//! reader tagged.

use std::fmt;
use std::time::Duration;

/// A cache tag.
///
/// Coarse variants cover an entity family as a whole; entity-specific
/// variants carry the slug or id of a single record and render as
/// `<entity>-<slug-or-id>` on the wire.
///
/// # Example
///
/// ```
/// use clinic_kit::tag::Tag;
///
/// assert_eq!(Tag::Clinics.to_string(), "clinics");
/// assert_eq!(Tag::Clinic("abc-dental".into()).to_string(), "clinic-abc-dental");
/// assert_eq!(Tag::ClinicReviews("42".into()).to_string(), "clinic-reviews-42");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// All clinic listing reads.
    Clinics,
    /// All clinic detail-page reads.
    ClinicDetails,
    /// All doctor listing reads.
    Doctors,
    /// All doctor detail-page reads.
    DoctorDetails,
    /// State index pages.
    States,
    /// Area index pages.
    Areas,
    /// Service index pages.
    Services,
    /// Review listings.
    Reviews,
    /// Site-wide static reference data.
    StaticData,

    /// A single clinic, by slug.
    Clinic(String),
    /// A single doctor, by slug.
    Doctor(String),
    /// One clinic's reviews, by clinic id.
    ClinicReviews(String),
    /// One clinic's weekly hours, by clinic id.
    ClinicHours(String),
    /// One clinic's special hours, by clinic id.
    ClinicSpecialHours(String),
    /// One clinic's image gallery, by clinic id.
    ClinicImages(String),
    /// One doctor's image gallery, by doctor id.
    DoctorImages(String),
    /// One clinic's service list, by clinic id.
    ClinicServices(String),
    /// One clinic's category list, by clinic id.
    ClinicCategories(String),
    /// A clinic's moderation status, by id and new status.
    ClinicStatus(String, String),
    /// A doctor's moderation status, by id and new status.
    DoctorStatus(String, String),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Clinics => write!(f, "clinics"),
            Tag::ClinicDetails => write!(f, "clinic-details"),
            Tag::Doctors => write!(f, "doctors"),
            Tag::DoctorDetails => write!(f, "doctor-details"),
            Tag::States => write!(f, "states"),
            Tag::Areas => write!(f, "areas"),
            Tag::Services => write!(f, "services"),
            Tag::Reviews => write!(f, "reviews"),
            Tag::StaticData => write!(f, "static-data"),
            Tag::Clinic(slug) => write!(f, "clinic-{}", slug),
            Tag::Doctor(slug) => write!(f, "doctor-{}", slug),
            Tag::ClinicReviews(id) => write!(f, "clinic-reviews-{}", id),
            Tag::ClinicHours(id) => write!(f, "clinic-hours-{}", id),
            Tag::ClinicSpecialHours(id) => write!(f, "clinic-special-hours-{}", id),
            Tag::ClinicImages(id) => write!(f, "clinic-images-{}", id),
            Tag::DoctorImages(id) => write!(f, "doctor-images-{}", id),
            Tag::ClinicServices(id) => write!(f, "clinic-services-{}", id),
            Tag::ClinicCategories(id) => write!(f, "clinic-categories-{}", id),
            Tag::ClinicStatus(id, status) => write!(f, "clinic-status-{}-{}", id, status),
            Tag::DoctorStatus(id, status) => write!(f, "doctor-status-{}-{}", id, status),
        }
    }
}

/// Data-volatility class driving the default revalidation interval.
///
/// Every cache entry is stored under one class. The class also contributes
/// a tag of its own, so an operator can flush a whole volatility band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Volatility {
    /// Reference data that changes on the order of releases. 24 hours.
    Static,
    /// Listing pages, area and state indexes. 1 hour.
    SemiStatic,
    /// Detail pages, review counts. 5 minutes.
    #[default]
    Dynamic,
    /// Open-now badges and anything clock-sensitive. 30 seconds.
    RealTime,
}

impl Volatility {
    /// Default revalidation interval for this class.
    pub fn ttl(&self) -> Duration {
        match self {
            Volatility::Static => Duration::from_secs(24 * 60 * 60),
            Volatility::SemiStatic => Duration::from_secs(60 * 60),
            Volatility::Dynamic => Duration::from_secs(5 * 60),
            Volatility::RealTime => Duration::from_secs(30),
        }
    }

    /// The tag attached to entries cached under this class.
    pub fn tag(&self) -> &'static str {
        match self {
            Volatility::Static => "static",
            Volatility::SemiStatic => "semi-static",
            Volatility::Dynamic => "dynamic",
            Volatility::RealTime => "real-time",
        }
    }
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
