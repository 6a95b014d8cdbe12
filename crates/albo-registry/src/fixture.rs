//! # Register Fixtures
//!
//! A [`RegistryFixture`] is a flat serde snapshot of an entire register,
//! used by the CLI and by tests. Snapshots are self-contained: catalog
//! ids are minted at runtime, so a fixture always carries the definitions
//! its assignments and documents reference.
//!
//! Replay is strict: duplicate keys, unknown references, and inverted
//! date ranges in the file surface as errors instead of being repaired.

use std::path::Path;

use serde::{Deserialize, Serialize};

use albo_core::{AlboError, HierarchyError, StoreError, ValidationError};

use crate::assignment::CompetenceAssignment;
use crate::catalog::{CompetenceDef, DocumentTypeDef};
use crate::document::VendorDocument;
use crate::hierarchy::Category;
use crate::registry::Registry;
use crate::vendor::Vendor;

/// Serializable snapshot of a whole register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFixture {
    /// Categories, any order; replay sorts out parent-before-child.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Competence definitions.
    #[serde(default)]
    pub competences: Vec<CompetenceDef>,
    /// Document-type definitions.
    #[serde(default)]
    pub document_types: Vec<DocumentTypeDef>,
    /// Vendor records.
    #[serde(default)]
    pub vendors: Vec<Vendor>,
    /// Competence assignments.
    #[serde(default)]
    pub assignments: Vec<CompetenceAssignment>,
    /// Vendor documents.
    #[serde(default)]
    pub documents: Vec<VendorDocument>,
}

impl RegistryFixture {
    /// Snapshot a register. Output ordering is deterministic (by code,
    /// then by id for the per-vendor records) so saved fixtures diff
    /// cleanly.
    pub fn from_registry(registry: &Registry) -> Self {
        let mut categories: Vec<Category> = registry.arena().iter().cloned().collect();
        categories.sort_by(|a, b| a.code.cmp(&b.code));

        let competences: Vec<CompetenceDef> = registry
            .competences()
            .sorted_by_code()
            .into_iter()
            .cloned()
            .collect();
        let document_types: Vec<DocumentTypeDef> = registry
            .document_types()
            .sorted_by_code()
            .into_iter()
            .cloned()
            .collect();

        let mut vendors: Vec<Vendor> = registry.vendors().cloned().collect();
        vendors.sort_by(|a, b| a.vendor_code.as_str().cmp(b.vendor_code.as_str()));

        let mut assignments: Vec<CompetenceAssignment> =
            registry.assignments().cloned().collect();
        assignments.sort_by_key(|a| (a.vendor_id, a.competence_id));

        let mut documents: Vec<VendorDocument> = registry.documents().cloned().collect();
        documents.sort_by_key(|d| (d.vendor_id, d.document_type_id));

        Self {
            categories,
            competences,
            document_types,
            vendors,
            assignments,
            documents,
        }
    }

    /// Replay the snapshot into a fresh register.
    pub fn into_registry(self) -> Result<Registry, AlboError> {
        let mut registry = Registry::new();

        // parents first; a round that makes no progress means the file
        // references a category it does not contain (or contains a cycle)
        let mut pending = self.categories;
        while !pending.is_empty() {
            let before = pending.len();
            let mut rest = Vec::new();
            for category in pending {
                let ready = category
                    .parent
                    .map_or(true, |parent| registry.arena().contains(parent));
                if ready {
                    registry.add_category(category)?;
                } else {
                    rest.push(category);
                }
            }
            if rest.len() == before {
                let stuck = &rest[0];
                return Err(
                    HierarchyError::UnknownCategory(stuck.parent.unwrap_or(stuck.id)).into(),
                );
            }
            pending = rest;
        }

        for def in self.competences {
            registry.add_competence_def(def)?;
        }
        for def in self.document_types {
            registry.add_document_type_def(def)?;
        }
        for vendor in self.vendors {
            registry.add_vendor(vendor)?;
        }
        for assignment in self.assignments {
            registry.insert_assignment(assignment)?;
        }
        for document in self.documents {
            registry.insert_document(document)?;
        }
        Ok(registry)
    }

    /// Decode a fixture from a string, picking the format from the
    /// file's extension (`.json`, `.yaml`, `.yml`).
    pub fn from_str_for(path: &Path, raw: &str) -> Result<Self, AlboError> {
        match extension(path) {
            Some("json") => {
                serde_json::from_str(raw).map_err(|err| malformed(path, &err.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(raw).map_err(|err| malformed(path, &err.to_string()))
            }
            _ => Err(malformed(path, "unsupported extension")),
        }
    }

    /// Encode the fixture for the format the file's extension names.
    pub fn to_string_for(&self, path: &Path) -> Result<String, AlboError> {
        match extension(path) {
            Some("json") => {
                serde_json::to_string_pretty(self).map_err(|err| malformed(path, &err.to_string()))
            }
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(self).map_err(|err| malformed(path, &err.to_string()))
            }
            _ => Err(malformed(path, "unsupported extension")),
        }
    }

    /// Read and decode a fixture file.
    pub fn load_path(path: &Path) -> Result<Self, AlboError> {
        let raw = std::fs::read_to_string(path).map_err(|err| StoreError::Unavailable {
            reason: format!("reading {}: {err}", path.display()),
        })?;
        Self::from_str_for(path, &raw)
    }

    /// Encode and write a fixture file.
    pub fn save_path(&self, path: &Path) -> Result<(), AlboError> {
        let encoded = self.to_string_for(path)?;
        std::fs::write(path, encoded).map_err(|err| {
            StoreError::Unavailable {
                reason: format!("writing {}: {err}", path.display()),
            }
            .into()
        })
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn malformed(path: &Path, reason: &str) -> AlboError {
    ValidationError::MalformedFixture {
        reason: format!("{}: {reason}", path.display()),
    }
    .into()
}
