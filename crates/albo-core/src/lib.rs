#![deny(missing_docs)]

//! # albo-core — Foundational Types for the Albo Vendor Qualification Stack
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It has no internal crate dependencies — only `serde`, `thiserror`,
//! `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Every identifier is a
//!    distinct type. You cannot pass a [`CategoryId`] where a [`VendorId`]
//!    is expected, and a [`VendorCode`] is validated at construction.
//!
//! 2. **Explicit as-of dates.** Every time-sensitive computation takes the
//!    reference date as an argument. Nothing in this crate (or the engine
//!    built on it) reads the wall clock; [`temporal::today_utc`] exists for
//!    the process boundaries (HTTP handlers, CLI) only.
//!
//! 3. **Closed status enums.** Qualification, document, and risk states are
//!    exhaustive enums with explicit serialization names, never free-form
//!    strings. Document status changes go through a transition table.
//!
//! 4. **[`AlboError`] hierarchy.** Structured errors with `thiserror` — no
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod ids;
pub mod status;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use domain::{CompetenceDomain, DocumentDomain};
pub use error::{
    AlboError, HierarchyError, StoreError, TransitionError, ValidationError,
};
pub use ids::{
    AssignmentId, CategoryId, CompetenceId, DocumentId, DocumentTypeId, EntityKind, VendorCode,
    VendorId,
};
pub use status::{DocumentStatus, QualificationStatus, RiskLevel, VendorType};
