//! # Compliance Aggregation
//!
//! Builds the per-vendor [`ComplianceReport`]: what is required, what is
//! missing, and what is expired or about to expire, all at an explicit
//! `as_of` date. Possession is decided by the stored records, but
//! validity is always re-derived from the expiry dates, so a stale
//! `Approved` status never hides a lapsed document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use albo_core::{AlboError, StoreError, VendorId};
use albo_registry::catalog::{CompetenceDef, DocumentTypeDef};
use albo_registry::{CompetenceAssignment, Registry, Vendor, VendorDocument};

use crate::expiry::{classify, ExpiryStatus, COMPETENCE_EXPIRING_SOON_DAYS};
use crate::requirements::RequirementResolver;

/// A catalog entry referenced from a report bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRef {
    /// Catalog id of the entry.
    pub id: Uuid,
    /// Business code of the entry.
    pub code: String,
    /// Human-readable name of the entry.
    pub name: String,
    /// Whether the catalog marks the entry mandatory.
    pub mandatory: bool,
}

impl RequirementRef {
    fn from_competence(def: &CompetenceDef) -> Self {
        Self {
            id: *def.id.as_uuid(),
            code: def.code.clone(),
            name: def.name.clone(),
            mandatory: def.mandatory,
        }
    }

    fn from_document_type(def: &DocumentTypeDef) -> Self {
        Self {
            id: *def.id.as_uuid(),
            code: def.code.clone(),
            name: def.name.clone(),
            mandatory: def.mandatory,
        }
    }
}

/// The compliance position of one vendor at one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Vendor the report is about.
    pub vendor_id: VendorId,
    /// The vendor's code, for log and display use.
    pub vendor_code: String,
    /// Evaluation date.
    pub as_of: NaiveDate,
    /// Required competences with no possessed record.
    pub missing_competences: Vec<RequirementRef>,
    /// Required document types with no possessed record.
    pub missing_documents: Vec<RequirementRef>,
    /// Possessed competences whose expiry date has passed.
    pub expired_competences: Vec<RequirementRef>,
    /// Possessed documents whose expiry date has passed.
    pub expired_documents: Vec<RequirementRef>,
    /// Possessed competences inside the alert window.
    pub expiring_competences: Vec<RequirementRef>,
    /// Possessed documents inside the alert window.
    pub expiring_documents: Vec<RequirementRef>,
    /// Verdict: nothing missing and nothing mandatory expired.
    pub is_fully_compliant: bool,
}

/// Borrowed view of one vendor's records, the evaluator's input.
#[derive(Debug)]
pub struct VendorSnapshot<'a> {
    /// The vendor record.
    pub vendor: &'a Vendor,
    /// The vendor's competence assignments.
    pub assignments: Vec<&'a CompetenceAssignment>,
    /// The vendor's documents.
    pub documents: Vec<&'a VendorDocument>,
}

impl<'a> VendorSnapshot<'a> {
    /// Collect a vendor's records from the register.
    pub fn from_registry(
        registry: &'a Registry,
        vendor_id: VendorId,
    ) -> Result<Self, StoreError> {
        let vendor = registry.get_vendor(vendor_id)?;
        Ok(Self {
            vendor,
            assignments: registry.assignments_for(vendor_id),
            documents: registry.documents_for(vendor_id),
        })
    }
}

/// Evaluate a vendor's compliance at `as_of`.
pub fn evaluate(
    resolver: &RequirementResolver<'_>,
    snapshot: &VendorSnapshot<'_>,
    as_of: NaiveDate,
) -> Result<ComplianceReport, AlboError> {
    let vendor = snapshot.vendor;
    let required_competences = resolver.required_competences(vendor)?;
    let required_documents = resolver.required_documents(vendor)?;

    let possessed_competences: Vec<&CompetenceAssignment> = snapshot
        .assignments
        .iter()
        .copied()
        .filter(|a| a.has_competence)
        .collect();
    let possessed_documents: Vec<&VendorDocument> = snapshot
        .documents
        .iter()
        .copied()
        .filter(|d| d.status.is_possessed())
        .collect();

    let mut missing_competences: Vec<RequirementRef> = required_competences
        .iter()
        .filter(|def| !possessed_competences.iter().any(|a| a.competence_id == def.id))
        .map(|def| RequirementRef::from_competence(def))
        .collect();
    let mut missing_documents: Vec<RequirementRef> = required_documents
        .iter()
        .filter(|def| {
            !possessed_documents
                .iter()
                .any(|d| d.document_type_id == def.id)
        })
        .map(|def| RequirementRef::from_document_type(def))
        .collect();

    let mut expired_competences = Vec::new();
    let mut expiring_competences = Vec::new();
    for assignment in &possessed_competences {
        // records for definitions no longer in the catalog cannot be
        // reported on and are skipped
        let Some(def) = resolver.competence(assignment.competence_id) else {
            continue;
        };
        match classify(assignment.expiry_date, COMPETENCE_EXPIRING_SOON_DAYS, as_of) {
            ExpiryStatus::Expired => expired_competences.push(RequirementRef::from_competence(def)),
            ExpiryStatus::ExpiringSoon => {
                expiring_competences.push(RequirementRef::from_competence(def))
            }
            ExpiryStatus::Valid | ExpiryStatus::NoExpiry => {}
        }
    }

    let mut expired_documents = Vec::new();
    let mut expiring_documents = Vec::new();
    for document in &possessed_documents {
        let Some(def) = resolver.document_type(document.document_type_id) else {
            continue;
        };
        match classify(document.expiry_date, def.alert_days_before_expiry, as_of) {
            ExpiryStatus::Expired => expired_documents.push(RequirementRef::from_document_type(def)),
            ExpiryStatus::ExpiringSoon => {
                expiring_documents.push(RequirementRef::from_document_type(def))
            }
            ExpiryStatus::Valid | ExpiryStatus::NoExpiry => {}
        }
    }

    for bucket in [
        &mut missing_competences,
        &mut missing_documents,
        &mut expired_competences,
        &mut expired_documents,
        &mut expiring_competences,
        &mut expiring_documents,
    ] {
        bucket.sort_by(|a, b| a.code.cmp(&b.code));
    }

    let mandatory_expired = expired_competences
        .iter()
        .chain(expired_documents.iter())
        .any(|item| item.mandatory);
    let is_fully_compliant =
        missing_competences.is_empty() && missing_documents.is_empty() && !mandatory_expired;

    Ok(ComplianceReport {
        vendor_id: vendor.id,
        vendor_code: vendor.vendor_code.as_str().to_string(),
        as_of,
        missing_competences,
        missing_documents,
        expired_competences,
        expired_documents,
        expiring_competences,
        expiring_documents,
        is_fully_compliant,
    })
}
