//! # albo-engine
//!
//! Evaluation over the vendor register. Everything in this crate is a
//! pure function of its inputs and an explicit `as_of` date: expiry
//! classification, requirement resolution against the category
//! hierarchy, per-vendor compliance reports, and the grouped dashboard
//! aggregations. No clock reads, no IO, no locking; callers snapshot the
//! register and hand it in.
//!
//! The one rule everything here bends around: a record with a past
//! expiry date is never reported valid, whatever status is stored on it.

#![deny(missing_docs)]

pub mod compliance;
pub mod dashboard;
pub mod expiry;
pub mod requirements;

pub use compliance::{evaluate, ComplianceReport, RequirementRef, VendorSnapshot};
pub use dashboard::{
    aggregate, document_summary, parse_dimensions, summarize, BucketCount, DashboardInput,
    Dimension, DocumentSummary, VendorSummary, UNSPECIFIED_KEY,
};
pub use expiry::{
    classify, classify_competence, CompetenceExpiryStatus, ExpiryStatus,
    COMPETENCE_EXPIRING_DAYS, COMPETENCE_EXPIRING_SOON_DAYS,
};
pub use requirements::RequirementResolver;
