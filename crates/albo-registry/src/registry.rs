//! # Register Aggregate
//!
//! [`Registry`] ties the hierarchy, the catalogs, and the per-vendor
//! records together and enforces the cross-entity invariants: codes are
//! unique within their kind, `(vendor, competence)` and `(vendor,
//! document type)` are unique keys, categories cannot be deleted while
//! referenced, and document submissions walk the review lifecycle.
//!
//! Two write styles coexist. `insert_*` is strict and errors on key
//! collisions; hydration and fixture replay use it so corrupt input
//! surfaces. `upsert_*`/`submit_*` carry the API semantics (update in
//! place, lifecycle-checked).

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use albo_core::{
    temporal, AlboError, AssignmentId, CategoryId, CompetenceId, DocumentId, DocumentStatus,
    DocumentTypeId, EntityKind, HierarchyError, StoreError, ValidationError, VendorId,
};

use crate::assignment::CompetenceAssignment;
use crate::catalog::{CompetenceCatalog, CompetenceDef, DocumentTypeCatalog, DocumentTypeDef};
use crate::document::VendorDocument;
use crate::hierarchy::{Category, CategoryArena};
use crate::seed;
use crate::vendor::Vendor;

/// The in-memory vendor register.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    categories: CategoryArena,
    category_codes: HashMap<String, CategoryId>,
    competences: CompetenceCatalog,
    document_types: DocumentTypeCatalog,
    vendors: HashMap<VendorId, Vendor>,
    vendor_codes: HashMap<String, VendorId>,
    assignments: HashMap<AssignmentId, CompetenceAssignment>,
    assignment_keys: HashMap<(VendorId, CompetenceId), AssignmentId>,
    documents: HashMap<DocumentId, VendorDocument>,
    document_keys: HashMap<(VendorId, DocumentTypeId), DocumentId>,
}

impl Registry {
    /// Create an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a register pre-loaded with the standard catalogs.
    pub fn with_standard_catalogs() -> Self {
        let mut registry = Self::new();
        for def in seed::standard_competences() {
            // standard codes are unique, insertion cannot collide
            let _ = registry.competences.insert(def);
        }
        for def in seed::standard_document_types() {
            let _ = registry.document_types.insert(def);
        }
        registry
    }

    // -- categories -----------------------------------------------------

    /// The category hierarchy.
    pub fn arena(&self) -> &CategoryArena {
        &self.categories
    }

    /// Look up a category.
    pub fn get_category(&self, id: CategoryId) -> Result<&Category, StoreError> {
        self.categories.get(id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Category,
            id: id.to_string(),
        })
    }

    /// Add a category. The code must be unique among categories and the
    /// parent, when given, must exist.
    pub fn add_category(&mut self, category: Category) -> Result<CategoryId, AlboError> {
        if category.code.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "code" }.into());
        }
        if category.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" }.into());
        }
        if let Some(&holder) = self.category_codes.get(&category.code) {
            if holder != category.id {
                return Err(ValidationError::DuplicateCode {
                    code: category.code,
                }
                .into());
            }
        }
        let code = category.code.clone();
        let id = self.categories.insert(category)?;
        self.category_codes.insert(code, id);
        Ok(id)
    }

    /// Re-parent a category. Refused edges leave the hierarchy unchanged.
    pub fn set_category_parent(
        &mut self,
        id: CategoryId,
        parent: Option<CategoryId>,
    ) -> Result<(), HierarchyError> {
        self.categories.set_parent(id, parent)
    }

    /// Delete a category. Blocked while subcategories, vendors, or
    /// catalog entries still reference it.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<Category, AlboError> {
        if !self.categories.contains(id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Category,
                id: id.to_string(),
            }
            .into());
        }
        let subcategories = self.categories.children(id).len();
        let vendors = self
            .vendors
            .values()
            .filter(|v| v.category == Some(id))
            .count();
        let catalog_refs = self
            .competences
            .iter()
            .filter(|d| d.applies_to.referenced_categories().contains(&id))
            .count()
            + self
                .document_types
                .iter()
                .filter(|d| d.applies_to.referenced_categories().contains(&id))
                .count();
        let references = subcategories + vendors + catalog_refs;
        if references > 0 {
            return Err(StoreError::StillReferenced {
                kind: EntityKind::Category,
                id: id.to_string(),
                references,
            }
            .into());
        }
        let removed = self.categories.remove(id).ok_or(StoreError::NotFound {
            kind: EntityKind::Category,
            id: id.to_string(),
        })?;
        self.category_codes.remove(&removed.code);
        Ok(removed)
    }

    // -- catalogs -------------------------------------------------------

    /// The competence catalog.
    pub fn competences(&self) -> &CompetenceCatalog {
        &self.competences
    }

    /// The document-type catalog.
    pub fn document_types(&self) -> &DocumentTypeCatalog {
        &self.document_types
    }

    /// Add a competence definition. Referenced categories must exist.
    pub fn add_competence_def(&mut self, def: CompetenceDef) -> Result<CompetenceId, AlboError> {
        def.validate()?;
        self.check_applicability(def.applies_to.referenced_categories())?;
        Ok(self.competences.insert(def)?)
    }

    /// Add a document-type definition. Referenced categories must exist.
    pub fn add_document_type_def(
        &mut self,
        def: DocumentTypeDef,
    ) -> Result<DocumentTypeId, AlboError> {
        def.validate()?;
        self.check_applicability(def.applies_to.referenced_categories())?;
        Ok(self.document_types.insert(def)?)
    }

    fn check_applicability(&self, referenced: &[CategoryId]) -> Result<(), HierarchyError> {
        for &category in referenced {
            if !self.categories.contains(category) {
                return Err(HierarchyError::UnknownCategory(category));
            }
        }
        Ok(())
    }

    // -- vendors --------------------------------------------------------

    /// Iterate over vendors in unspecified order.
    pub fn vendors(&self) -> impl Iterator<Item = &Vendor> {
        self.vendors.values()
    }

    /// Number of vendors.
    pub fn vendor_count(&self) -> usize {
        self.vendors.len()
    }

    /// Look up a vendor by id.
    pub fn get_vendor(&self, id: VendorId) -> Result<&Vendor, StoreError> {
        self.vendors.get(&id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Vendor,
            id: id.to_string(),
        })
    }

    /// Look up a vendor by its code.
    pub fn vendor_by_code(&self, code: &str) -> Option<&Vendor> {
        self.vendor_codes.get(code).and_then(|id| self.vendors.get(id))
    }

    /// Add a vendor. The vendor code must be unique and the category,
    /// when set, must exist.
    pub fn add_vendor(&mut self, vendor: Vendor) -> Result<VendorId, AlboError> {
        vendor.validate()?;
        if let Some(category) = vendor.category {
            if !self.categories.contains(category) {
                return Err(HierarchyError::UnknownCategory(category).into());
            }
        }
        let code = vendor.vendor_code.as_str().to_string();
        if let Some(&holder) = self.vendor_codes.get(&code) {
            if holder != vendor.id {
                return Err(ValidationError::DuplicateCode { code }.into());
            }
        }
        let id = vendor.id;
        self.vendors.insert(id, vendor);
        self.vendor_codes.insert(code, id);
        Ok(id)
    }

    /// Update a vendor through a mutation closure. Identity fields are
    /// pinned, the result is re-validated, and the record is only
    /// committed when the checks pass.
    pub fn update_vendor<F>(&mut self, id: VendorId, mutate: F) -> Result<&Vendor, AlboError>
    where
        F: FnOnce(&mut Vendor),
    {
        let current = self.get_vendor(id)?.clone();
        let mut updated = current.clone();
        mutate(&mut updated);
        updated.id = current.id;
        updated.vendor_code = current.vendor_code;
        updated.created_at = current.created_at;
        updated.validate()?;
        if let Some(category) = updated.category {
            if !self.categories.contains(category) {
                return Err(HierarchyError::UnknownCategory(category).into());
            }
        }
        updated.touch();
        self.vendors.insert(id, updated);
        Ok(&self.vendors[&id])
    }

    // -- assignments ----------------------------------------------------

    /// Iterate over assignments in unspecified order.
    pub fn assignments(&self) -> impl Iterator<Item = &CompetenceAssignment> {
        self.assignments.values()
    }

    /// A vendor's assignments.
    pub fn assignments_for(&self, vendor: VendorId) -> Vec<&CompetenceAssignment> {
        self.assignments
            .values()
            .filter(|a| a.vendor_id == vendor)
            .collect()
    }

    /// Strictly insert an assignment; a second record for the same
    /// `(vendor, competence)` pair is refused. Hydration path.
    pub fn insert_assignment(
        &mut self,
        assignment: CompetenceAssignment,
    ) -> Result<AssignmentId, AlboError> {
        self.check_assignment_refs(&assignment)?;
        assignment.validate()?;
        let key = (assignment.vendor_id, assignment.competence_id);
        if self.assignment_keys.contains_key(&key) {
            let entry = self.competence_code(assignment.competence_id);
            return Err(ValidationError::DuplicateAssignment {
                vendor: assignment.vendor_id,
                entry,
            }
            .into());
        }
        let id = assignment.id;
        self.assignment_keys.insert(key, id);
        self.assignments.insert(id, assignment);
        Ok(id)
    }

    /// Insert or update the assignment for the record's `(vendor,
    /// competence)` pair. An existing record keeps its id.
    pub fn upsert_assignment(
        &mut self,
        mut assignment: CompetenceAssignment,
    ) -> Result<AssignmentId, AlboError> {
        self.check_assignment_refs(&assignment)?;
        assignment.validate()?;
        let key = (assignment.vendor_id, assignment.competence_id);
        if let Some(&existing) = self.assignment_keys.get(&key) {
            assignment.id = existing;
            self.assignments.insert(existing, assignment);
            return Ok(existing);
        }
        let id = assignment.id;
        self.assignment_keys.insert(key, id);
        self.assignments.insert(id, assignment);
        Ok(id)
    }

    fn check_assignment_refs(&self, assignment: &CompetenceAssignment) -> Result<(), StoreError> {
        if !self.vendors.contains_key(&assignment.vendor_id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Vendor,
                id: assignment.vendor_id.to_string(),
            });
        }
        if !self.competences.contains(assignment.competence_id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Competence,
                id: assignment.competence_id.to_string(),
            });
        }
        Ok(())
    }

    fn competence_code(&self, id: CompetenceId) -> String {
        self.competences
            .get(id)
            .map(|d| d.code.clone())
            .unwrap_or_else(|| id.to_string())
    }

    // -- documents ------------------------------------------------------

    /// Iterate over documents in unspecified order.
    pub fn documents(&self) -> impl Iterator<Item = &VendorDocument> {
        self.documents.values()
    }

    /// Number of documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// A vendor's documents.
    pub fn documents_for(&self, vendor: VendorId) -> Vec<&VendorDocument> {
        self.documents
            .values()
            .filter(|d| d.vendor_id == vendor)
            .collect()
    }

    /// Look up a document by id.
    pub fn get_document(&self, id: DocumentId) -> Result<&VendorDocument, StoreError> {
        self.documents.get(&id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Document,
            id: id.to_string(),
        })
    }

    /// Strictly insert a document record; a second record for the same
    /// `(vendor, document type)` pair is refused. Hydration path.
    pub fn insert_document(&mut self, document: VendorDocument) -> Result<DocumentId, AlboError> {
        self.check_document_refs(document.vendor_id, document.document_type_id)?;
        document.validate()?;
        let key = (document.vendor_id, document.document_type_id);
        if self.document_keys.contains_key(&key) {
            let entry = self
                .document_types
                .get(document.document_type_id)
                .map(|d| d.code.clone())
                .unwrap_or_else(|| document.document_type_id.to_string());
            return Err(ValidationError::DuplicateAssignment {
                vendor: document.vendor_id,
                entry,
            }
            .into());
        }
        let id = document.id;
        self.document_keys.insert(key, id);
        self.documents.insert(id, document);
        Ok(id)
    }

    /// Record a submission for `(vendor, document type)`.
    ///
    /// A missing expiry date defaults to `issue_date` plus the type's
    /// `default_validity_days` when both are available. Re-submission on
    /// an existing record follows the lifecycle: allowed from Pending and
    /// Expired, refused while a submission is already in flight or still
    /// approved. A rejected record is terminal, so a new submission
    /// replaces it under a fresh id.
    pub fn submit_document(
        &mut self,
        vendor_id: VendorId,
        document_type_id: DocumentTypeId,
        issue_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        notes: Option<String>,
    ) -> Result<DocumentId, AlboError> {
        self.check_document_refs(vendor_id, document_type_id)?;
        // lookup can't miss after the refs check
        let def = self
            .document_types
            .get(document_type_id)
            .ok_or(StoreError::NotFound {
                kind: EntityKind::DocumentType,
                id: document_type_id.to_string(),
            })?;
        let expiry_date = expiry_date.or_else(|| {
            match (issue_date, def.default_validity_days) {
                (Some(issue), Some(days)) => Some(issue + Duration::days(i64::from(days))),
                _ => None,
            }
        });
        temporal::check_date_range(issue_date, expiry_date)?;

        let key = (vendor_id, document_type_id);
        match self.document_keys.get(&key).copied() {
            None => {
                let mut document = VendorDocument::new(vendor_id, document_type_id)
                    .with_dates(issue_date, expiry_date)
                    .with_status(DocumentStatus::Submitted);
                document.notes = notes;
                let id = document.id;
                self.document_keys.insert(key, id);
                self.documents.insert(id, document);
                Ok(id)
            }
            Some(existing_id) => {
                let existing = self.documents.get(&existing_id).ok_or(StoreError::NotFound {
                    kind: EntityKind::Document,
                    id: existing_id.to_string(),
                })?;
                if existing.status == DocumentStatus::Rejected {
                    let mut replacement = VendorDocument::new(vendor_id, document_type_id)
                        .with_dates(issue_date, expiry_date)
                        .with_status(DocumentStatus::Submitted);
                    replacement.notes = notes;
                    let id = replacement.id;
                    self.documents.remove(&existing_id);
                    self.documents.insert(id, replacement);
                    self.document_keys.insert(key, id);
                    return Ok(id);
                }
                let mut updated = existing.clone();
                updated.advance(DocumentStatus::Submitted)?;
                updated.issue_date = issue_date;
                updated.expiry_date = expiry_date;
                updated.verified = false;
                if notes.is_some() {
                    updated.notes = notes;
                }
                self.documents.insert(existing_id, updated);
                Ok(existing_id)
            }
        }
    }

    /// Apply a review decision to a document. Approval marks the record
    /// verified; rejection and takeover (`UnderReview`) leave the flag
    /// untouched.
    pub fn review_document(
        &mut self,
        id: DocumentId,
        decision: DocumentStatus,
        notes: Option<String>,
    ) -> Result<&VendorDocument, AlboError> {
        let document = self.documents.get_mut(&id).ok_or(StoreError::NotFound {
            kind: EntityKind::Document,
            id: id.to_string(),
        })?;
        document.advance(decision)?;
        if decision == DocumentStatus::Approved {
            document.verified = true;
        }
        if notes.is_some() {
            document.notes = notes;
        }
        Ok(&self.documents[&id])
    }

    // -- batch ----------------------------------------------------------

    /// Flip documents whose expiry date has passed to `Expired`.
    ///
    /// Only Submitted, UnderReview, and Approved records flip; Rejected
    /// stays Rejected and records without an expiry date never flip.
    /// Running it twice with the same `as_of` is a no-op the second time.
    pub fn recompute_expired_statuses(&mut self, as_of: NaiveDate) -> usize {
        let mut updated = 0usize;
        for document in self.documents.values_mut() {
            let lapsed = document.expiry_date.is_some_and(|expiry| expiry < as_of);
            if lapsed && document.status.expirable() {
                // batch flip rule, not part of the interactive lifecycle
                document.status = DocumentStatus::Expired;
                updated += 1;
            }
        }
        tracing::info!(updated, %as_of, "recomputed expired document statuses");
        updated
    }

    fn check_document_refs(
        &self,
        vendor_id: VendorId,
        document_type_id: DocumentTypeId,
    ) -> Result<(), StoreError> {
        if !self.vendors.contains_key(&vendor_id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::Vendor,
                id: vendor_id.to_string(),
            });
        }
        if !self.document_types.contains(document_type_id) {
            return Err(StoreError::NotFound {
                kind: EntityKind::DocumentType,
                id: document_type_id.to_string(),
            });
        }
        Ok(())
    }
}
