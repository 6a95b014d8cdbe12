//! # Requirement Resolution
//!
//! Resolves which catalog entries a vendor must hold, from its category
//! and the entries' applicability. Resolution looks only at the catalogs
//! and the hierarchy; what the vendor actually possesses is the
//! compliance aggregator's business.

use albo_core::{CompetenceId, DocumentTypeId, HierarchyError};
use albo_registry::catalog::{CompetenceDef, DocumentTypeDef};
use albo_registry::hierarchy::CategoryArena;
use albo_registry::{CompetenceCatalog, DocumentTypeCatalog, Registry, Vendor};

/// Resolver over borrowed register state.
#[derive(Clone, Copy)]
pub struct RequirementResolver<'a> {
    arena: &'a CategoryArena,
    competences: &'a CompetenceCatalog,
    document_types: &'a DocumentTypeCatalog,
}

impl<'a> RequirementResolver<'a> {
    /// Build a resolver over explicit parts.
    pub fn new(
        arena: &'a CategoryArena,
        competences: &'a CompetenceCatalog,
        document_types: &'a DocumentTypeCatalog,
    ) -> Self {
        Self {
            arena,
            competences,
            document_types,
        }
    }

    /// Build a resolver over a register.
    pub fn from_registry(registry: &'a Registry) -> Self {
        Self::new(
            registry.arena(),
            registry.competences(),
            registry.document_types(),
        )
    }

    /// Look up a competence definition by id.
    pub fn competence(&self, id: CompetenceId) -> Option<&'a CompetenceDef> {
        self.competences.get(id)
    }

    /// Look up a document-type definition by id.
    pub fn document_type(&self, id: DocumentTypeId) -> Option<&'a DocumentTypeDef> {
        self.document_types.get(id)
    }

    /// Mandatory competences the vendor must hold, sorted by code.
    /// A vendor without a category has no requirements.
    pub fn required_competences(
        &self,
        vendor: &Vendor,
    ) -> Result<Vec<&'a CompetenceDef>, HierarchyError> {
        let Some(category) = vendor.category else {
            return Ok(Vec::new());
        };
        let mut required = Vec::new();
        for def in self.competences.active() {
            if def.mandatory && def.applies_to.applies_to(Some(category), self.arena)? {
                required.push(def);
            }
        }
        required.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(required)
    }

    /// Mandatory document types the vendor must keep on file, sorted by
    /// code. A vendor without a category has no requirements.
    pub fn required_documents(
        &self,
        vendor: &Vendor,
    ) -> Result<Vec<&'a DocumentTypeDef>, HierarchyError> {
        let Some(category) = vendor.category else {
            return Ok(Vec::new());
        };
        let mut required = Vec::new();
        for def in self.document_types.active() {
            if def.mandatory && def.applies_to.applies_to(Some(category), self.arena)? {
                required.push(def);
            }
        }
        required.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(required)
    }
}
