//! # Status Enums
//!
//! Closed enums for vendor qualification, document lifecycle, risk level,
//! and vendor type. Serialization uses `SCREAMING_SNAKE_CASE` for the
//! stored statuses to match the persisted representation, preventing
//! free-form status strings from ever entering the system.
//!
//! [`DocumentStatus`] changes go through [`DocumentStatus::transition`],
//! which enforces the review-lifecycle table. The stored status is only a
//! cache of the last write: compliance evaluation always re-derives expiry
//! from `expiry_date`, so a stale `APPROVED` never masks an expired record.

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;

// -- QualificationStatus ------------------------------------------------------

/// Vendor qualification status as recorded by the back office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationStatus {
    /// Qualification review has not concluded.
    Pending,
    /// The vendor passed qualification.
    Approved,
    /// The vendor failed qualification.
    Rejected,
}

impl QualificationStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for QualificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- DocumentStatus -----------------------------------------------------------

/// Lifecycle status of a vendor document.
///
/// `Rejected` is terminal: a rejected document never auto-expires and must
/// be re-recorded from scratch. `Expired` allows `Submitted` so a vendor
/// can re-submit after renewal without deleting the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Created as a placeholder; nothing submitted yet.
    Pending,
    /// The vendor submitted the document.
    Submitted,
    /// A reviewer picked the document up.
    UnderReview,
    /// The document passed review.
    Approved,
    /// The document failed review. Terminal.
    Rejected,
    /// The document's expiry date has passed.
    Expired,
}

impl DocumentStatus {
    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Submitted => "SUBMITTED",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Whether a document in this status counts as possessed for
    /// compliance purposes. `Rejected` and `Expired` do not: both demand a
    /// (re-)submission, so they are treated like a missing record.
    pub fn is_possessed(&self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview | Self::Approved)
    }

    /// Whether the batch expiry job may flip this status to `Expired`.
    /// `Rejected` stays `Rejected`; `Pending` has nothing to expire.
    pub fn expirable(&self) -> bool {
        matches!(self, Self::Submitted | Self::UnderReview | Self::Approved)
    }

    /// Whether the review-lifecycle table allows `self -> to`.
    pub fn can_transition(&self, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!(
            (self, to),
            (Pending, Submitted)
                | (Submitted, UnderReview)
                | (Submitted, Approved)
                | (Submitted, Rejected)
                | (UnderReview, Approved)
                | (UnderReview, Rejected)
                | (Approved, Expired)
                | (Expired, Submitted)
        )
    }

    /// Apply a transition, returning the new status or an
    /// [`TransitionError::InvalidTransition`] naming both states.
    pub fn transition(self, to: DocumentStatus) -> Result<DocumentStatus, TransitionError> {
        if self.can_transition(to) {
            return Ok(to);
        }
        let reason = match self {
            Self::Rejected => "rejected documents are terminal and must be re-recorded",
            _ if self == to => "document is already in the requested status",
            _ => "no such transition in the review lifecycle",
        };
        Err(TransitionError::InvalidTransition {
            from: self.as_str().to_string(),
            to: to.as_str().to_string(),
            reason: reason.to_string(),
        })
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- RiskLevel ----------------------------------------------------------------

/// Vendor risk classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Routine supplier, standard controls.
    Low,
    /// Elevated attention during audits.
    Medium,
    /// Subject to the strictest controls and audit cadence.
    High,
}

impl RiskLevel {
    /// Return the string representation of this risk level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- VendorType ---------------------------------------------------------------

/// Legal form of a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorType {
    /// Incorporated company.
    Company,
    /// Sole proprietorship.
    SoleProprietor,
    /// Individual professional.
    Freelancer,
    /// Consortium of companies.
    Consortium,
}

impl VendorType {
    /// Return the string representation of this vendor type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::SoleProprietor => "sole_proprietor",
            Self::Freelancer => "freelancer",
            Self::Consortium => "consortium",
        }
    }
}

impl std::fmt::Display for VendorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualification_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&QualificationStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let back: QualificationStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(back, QualificationStatus::Approved);
    }

    #[test]
    fn document_status_serde_under_review() {
        assert_eq!(
            serde_json::to_string(&DocumentStatus::UnderReview).unwrap(),
            "\"UNDER_REVIEW\""
        );
    }

    #[test]
    fn possessed_statuses() {
        assert!(DocumentStatus::Submitted.is_possessed());
        assert!(DocumentStatus::UnderReview.is_possessed());
        assert!(DocumentStatus::Approved.is_possessed());
        assert!(!DocumentStatus::Pending.is_possessed());
        assert!(!DocumentStatus::Rejected.is_possessed());
        assert!(!DocumentStatus::Expired.is_possessed());
    }

    #[test]
    fn expirable_excludes_rejected_and_pending() {
        assert!(DocumentStatus::Approved.expirable());
        assert!(DocumentStatus::Submitted.expirable());
        assert!(DocumentStatus::UnderReview.expirable());
        assert!(!DocumentStatus::Rejected.expirable());
        assert!(!DocumentStatus::Pending.expirable());
        assert!(!DocumentStatus::Expired.expirable());
    }

    #[test]
    fn allowed_transitions() {
        use DocumentStatus::*;
        assert!(Pending.can_transition(Submitted));
        assert!(Submitted.can_transition(UnderReview));
        assert!(Submitted.can_transition(Approved));
        assert!(Submitted.can_transition(Rejected));
        assert!(UnderReview.can_transition(Approved));
        assert!(UnderReview.can_transition(Rejected));
        assert!(Approved.can_transition(Expired));
        assert!(Expired.can_transition(Submitted));
    }

    #[test]
    fn rejected_is_terminal() {
        use DocumentStatus::*;
        for to in [Pending, Submitted, UnderReview, Approved, Expired] {
            assert!(!Rejected.can_transition(to), "Rejected -> {to} must be refused");
        }
        let err = Rejected.transition(Expired).unwrap_err();
        assert!(format!("{err}").contains("REJECTED"));
    }

    #[test]
    fn self_transition_rejected_with_reason() {
        let err = DocumentStatus::Approved
            .transition(DocumentStatus::Approved)
            .unwrap_err();
        assert!(format!("{err}").contains("already"));
    }

    #[test]
    fn disallowed_pairs_exhaustive() {
        use DocumentStatus::*;
        let all = [Pending, Submitted, UnderReview, Approved, Rejected, Expired];
        let allowed = [
            (Pending, Submitted),
            (Submitted, UnderReview),
            (Submitted, Approved),
            (Submitted, Rejected),
            (UnderReview, Approved),
            (UnderReview, Rejected),
            (Approved, Expired),
            (Expired, Submitted),
        ];
        for from in all {
            for to in all {
                let expect = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition(to),
                    expect,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn transition_returns_target() {
        let next = DocumentStatus::Submitted
            .transition(DocumentStatus::Approved)
            .unwrap();
        assert_eq!(next, DocumentStatus::Approved);
    }

    #[test]
    fn risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn risk_level_serde_names() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn vendor_type_as_str() {
        assert_eq!(VendorType::Company.as_str(), "company");
        assert_eq!(VendorType::SoleProprietor.as_str(), "sole_proprietor");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", DocumentStatus::UnderReview), "UNDER_REVIEW");
        assert_eq!(format!("{}", QualificationStatus::Rejected), "REJECTED");
        assert_eq!(format!("{}", RiskLevel::Medium), "MEDIUM");
        assert_eq!(format!("{}", VendorType::Freelancer), "freelancer");
    }
}
