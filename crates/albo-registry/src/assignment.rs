//! # Competence Assignments
//!
//! The link between a vendor and a competence definition: whether the
//! vendor holds it, whether a certification backs it, and its validity
//! window. At most one assignment exists per `(vendor, competence)` pair;
//! the register enforces that key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use albo_core::{temporal, AssignmentId, CompetenceId, ValidationError, VendorId};

const fn default_true() -> bool {
    true
}

/// A vendor's claim to a competence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetenceAssignment {
    /// Unique identifier.
    pub id: AssignmentId,
    /// Vendor holding the competence.
    pub vendor_id: VendorId,
    /// Competence being held.
    pub competence_id: CompetenceId,
    /// Whether the vendor currently claims the competence. Imports
    /// default this to true; it is cleared when a competence is revoked
    /// without deleting the history.
    #[serde(default = "default_true")]
    pub has_competence: bool,
    /// Whether a certification document backs the claim.
    #[serde(default)]
    pub has_certification: bool,
    /// Date the competence (or its certification) was issued.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Date the competence lapses. `None` means it never does.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Whether the back office verified the claim. Imported records
    /// start unverified.
    #[serde(default)]
    pub verified: bool,
}

impl CompetenceAssignment {
    /// Create an unverified, uncertified claim with a fresh id.
    pub fn new(vendor_id: VendorId, competence_id: CompetenceId) -> Self {
        Self {
            id: AssignmentId::new(),
            vendor_id,
            competence_id,
            has_competence: true,
            has_certification: false,
            issue_date: None,
            expiry_date: None,
            verified: false,
        }
    }

    /// Back the claim with a certification.
    pub fn with_certification(mut self) -> Self {
        self.has_certification = true;
        self
    }

    /// Set the validity window.
    pub fn with_dates(mut self, issue: Option<NaiveDate>, expiry: Option<NaiveDate>) -> Self {
        self.issue_date = issue;
        self.expiry_date = expiry;
        self
    }

    /// Mark the claim as verified.
    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }

    /// Check structural validity of the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        temporal::check_date_range(self.issue_date, self.expiry_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_assignment_defaults() {
        let assignment = CompetenceAssignment::new(VendorId::new(), CompetenceId::new());
        assert!(assignment.has_competence);
        assert!(!assignment.has_certification);
        assert!(!assignment.verified);
        assert_eq!(assignment.expiry_date, None);
    }

    #[test]
    fn validate_rejects_inverted_dates() {
        let assignment = CompetenceAssignment::new(VendorId::new(), CompetenceId::new())
            .with_dates(Some(d(2026, 1, 1)), Some(d(2025, 1, 1)));
        assert!(matches!(
            assignment.validate().unwrap_err(),
            ValidationError::InvalidDateRange { .. }
        ));
    }

    #[test]
    fn validate_accepts_open_windows() {
        let base = CompetenceAssignment::new(VendorId::new(), CompetenceId::new());
        assert!(base.clone().validate().is_ok());
        assert!(base
            .clone()
            .with_dates(Some(d(2025, 1, 1)), None)
            .validate()
            .is_ok());
        assert!(base
            .with_dates(None, Some(d(2026, 1, 1)))
            .validate()
            .is_ok());
    }

    #[test]
    fn serde_defaults_match_import_conventions() {
        let json = format!(
            r#"{{
                "id": "{}",
                "vendor_id": "{}",
                "competence_id": "{}"
            }}"#,
            AssignmentId::new(),
            VendorId::new(),
            CompetenceId::new()
        );
        let assignment: CompetenceAssignment = serde_json::from_str(&json).unwrap();
        assert!(assignment.has_competence);
        assert!(!assignment.verified);
    }
}
