//! # Vendor Documents
//!
//! A vendor's copy of a required document: its validity window and its
//! review status. At most one document exists per `(vendor, document
//! type)` pair; re-submissions update the record in place through the
//! lifecycle table rather than accumulating rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use albo_core::{
    temporal, DocumentId, DocumentStatus, DocumentTypeId, TransitionError, ValidationError,
    VendorId,
};

/// A document a vendor keeps on file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDocument {
    /// Unique identifier.
    pub id: DocumentId,
    /// Vendor the document belongs to.
    pub vendor_id: VendorId,
    /// Document type this record instantiates.
    pub document_type_id: DocumentTypeId,
    /// Date the document was issued.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Date the document expires. `None` means it never does.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Review lifecycle status.
    pub status: DocumentStatus,
    /// Whether the back office verified the document contents.
    #[serde(default)]
    pub verified: bool,
    /// Reviewer notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl VendorDocument {
    /// Create a pending placeholder with a fresh id.
    pub fn new(vendor_id: VendorId, document_type_id: DocumentTypeId) -> Self {
        Self {
            id: DocumentId::new(),
            vendor_id,
            document_type_id,
            issue_date: None,
            expiry_date: None,
            status: DocumentStatus::Pending,
            verified: false,
            notes: None,
        }
    }

    /// Set the validity window on a freshly built document.
    pub fn with_dates(mut self, issue: Option<NaiveDate>, expiry: Option<NaiveDate>) -> Self {
        self.issue_date = issue;
        self.expiry_date = expiry;
        self
    }

    /// Set the status on a freshly built document, without lifecycle
    /// checks. Test and fixture use; live changes go through
    /// [`VendorDocument::advance`].
    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = status;
        self
    }

    /// Move the document through the review lifecycle. The record keeps
    /// its current status when the transition is refused.
    pub fn advance(&mut self, to: DocumentStatus) -> Result<(), TransitionError> {
        self.status = self.status.transition(to)?;
        Ok(())
    }

    /// Check structural validity of the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        temporal::check_date_range(self.issue_date, self.expiry_date)
    }
}
