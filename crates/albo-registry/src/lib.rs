//! # albo-registry
//!
//! The in-memory vendor register. This crate owns the mutable state of
//! the platform: the category hierarchy, the competence and document-type
//! catalogs, and the per-vendor records (assignments and documents). The
//! [`Registry`] aggregate enforces the write-side invariants: unique
//! codes, one assignment per `(vendor, competence)` pair, one document
//! per `(vendor, document type)` pair, acyclic categories, and the
//! document review lifecycle.
//!
//! Evaluation lives elsewhere (`albo-engine`) and only reads from here.
//! Fixture files ([`RegistryFixture`]) give the CLI and tests a way to
//! snapshot and restore a whole register from JSON or YAML.

#![deny(missing_docs)]

pub mod assignment;
pub mod catalog;
pub mod document;
pub mod fixture;
pub mod hierarchy;
pub mod registry;
pub mod seed;
pub mod vendor;

pub use assignment::CompetenceAssignment;
pub use catalog::{
    Applicability, CategoryScope, CompetenceCatalog, CompetenceDef, DocumentTypeCatalog,
    DocumentTypeDef,
};
pub use document::VendorDocument;
pub use fixture::RegistryFixture;
pub use hierarchy::{Category, CategoryArena, MAX_CATEGORY_DEPTH};
pub use registry::Registry;
pub use vendor::Vendor;
