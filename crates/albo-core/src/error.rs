//! # Error Types
//!
//! Error hierarchy for registry and evaluation operations. Sub-errors are
//! grouped by concern and roll up into [`AlboError`] via `#[from]`, so
//! call sites can use `?` across layers without manual conversion.

use chrono::NaiveDate;
use thiserror::Error;

use crate::ids::{CategoryId, EntityKind, VendorId};

/// Top-level error for registry and evaluation operations.
#[derive(Debug, Error)]
pub enum AlboError {
    /// A lookup or persistence operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A category hierarchy operation failed.
    #[error("hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A status transition was not allowed.
    #[error("transition error: {0}")]
    Transition(#[from] TransitionError),
}

/// Lookup and persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with the given identifier exists.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of record that was looked up.
        kind: EntityKind,
        /// Identifier that missed.
        id: String,
    },

    /// The backing store cannot currently be read. Evaluation surfaces
    /// this instead of reporting an empty (falsely compliant) result.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// Why the store is unreachable.
        reason: String,
    },

    /// The record cannot be deleted while other records point at it.
    #[error("{kind} {id} is still referenced by {references} record(s)")]
    StillReferenced {
        /// Kind of record that was targeted.
        kind: EntityKind,
        /// Identifier of the targeted record.
        id: String,
        /// Number of records that still reference it.
        references: usize,
    },
}

/// Category hierarchy failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// Re-parenting would make the category an ancestor of itself.
    /// The hierarchy is left unchanged when this is returned.
    #[error("setting parent of category {category} to {requested_parent} would create a cycle")]
    CycleDetected {
        /// Category whose parent was being changed.
        category: CategoryId,
        /// Parent that was requested.
        requested_parent: CategoryId,
    },

    /// An ancestor walk ran past the depth bound, which means the stored
    /// hierarchy is corrupt.
    #[error("category hierarchy exceeds maximum depth {max_depth} starting from {start}")]
    DepthExceeded {
        /// Category the walk started from.
        start: CategoryId,
        /// Depth bound that was hit.
        max_depth: usize,
    },

    /// A referenced category does not exist in the hierarchy.
    #[error("unknown category {0}")]
    UnknownCategory(CategoryId),
}

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// An issue date on or after its expiry date.
    #[error("issue date {issue_date} is not before expiry date {expiry_date}")]
    InvalidDateRange {
        /// Date the record was issued.
        issue_date: NaiveDate,
        /// Date the record expires.
        expiry_date: NaiveDate,
    },

    /// A required text field was empty or whitespace.
    #[error("field `{field}` must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A numeric field was outside its allowed range.
    #[error("field `{field}` value {value} outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// A code that another record of the same kind already uses.
    #[error("code `{code}` is already in use")]
    DuplicateCode {
        /// The colliding code.
        code: String,
    },

    /// The vendor already has a record for this catalog entry.
    #[error("vendor {vendor} already has an entry for {entry}")]
    DuplicateAssignment {
        /// Vendor the record was being added to.
        vendor: VendorId,
        /// Code of the catalog entry that is already covered.
        entry: String,
    },

    /// A dashboard dimension name that is not in the closed set.
    #[error("unknown dashboard dimension `{0}`")]
    UnknownDimension(String),

    /// A date string that does not parse as `YYYY-MM-DD`.
    #[error("invalid date `{value}`: {reason}")]
    InvalidDate {
        /// The string that failed to parse.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A vendor code with the wrong length or character set.
    #[error("invalid vendor code `{0}`: expected 10 uppercase alphanumeric characters")]
    InvalidVendorCode(String),

    /// A fixture file that could not be decoded.
    #[error("malformed fixture: {reason}")]
    MalformedFixture {
        /// Decoder diagnostic.
        reason: String,
    },
}

/// Status transition failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The requested transition is not in the lifecycle table.
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// Status the record is currently in.
        from: String,
        /// Status that was requested.
        to: String,
        /// Why the transition is refused.
        reason: String,
    },
}
