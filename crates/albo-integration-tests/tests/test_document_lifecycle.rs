//! # Document Review Lifecycle
//!
//! Walks document records through the full review lifecycle across the
//! registry and the status table in albo-core:
//! - The transition table, exhaustively
//! - Submit, review, expire, resubmit on the same record
//! - Rejection is terminal and replacement mints a fresh record
//! - The expiry sweep is idempotent and never touches rejected records

use albo_core::{DocumentDomain, DocumentStatus, TransitionError};
use albo_registry::{DocumentTypeDef, Registry, Vendor};
use chrono::NaiveDate;

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn seeded() -> (Registry, albo_core::VendorId, albo_core::DocumentTypeId) {
    let mut registry = Registry::new();
    let durc = registry
        .add_document_type_def(
            DocumentTypeDef::new(
                "DURC",
                "Documento Unico di Regolarità Contributiva",
                DocumentDomain::Legal,
            )
            .mandatory()
            .with_validity(120, 30),
        )
        .unwrap();
    let vendor = registry
        .add_vendor(Vendor::new("Rossi Impianti S.r.l."))
        .unwrap();
    (registry, vendor, durc)
}

// ---------------------------------------------------------------------------
// 1. The transition table, exhaustively
// ---------------------------------------------------------------------------

const ALL_STATUSES: [DocumentStatus; 6] = [
    DocumentStatus::Pending,
    DocumentStatus::Submitted,
    DocumentStatus::UnderReview,
    DocumentStatus::Approved,
    DocumentStatus::Rejected,
    DocumentStatus::Expired,
];

#[test]
fn transition_table_is_exactly_the_allowed_set() {
    use DocumentStatus::*;
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

    for from in ALL_STATUSES {
        for to in ALL_STATUSES {
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                from.can_transition(to),
                expected,
                "{from} -> {to} should be {}allowed",
                if expected { "" } else { "dis" }
            );
        }
    }
}

#[test]
fn rejected_is_terminal_with_a_named_reason() {
    let err = DocumentStatus::Rejected
        .transition(DocumentStatus::Submitted)
        .unwrap_err();
    let TransitionError::InvalidTransition { from, to, reason } = err;
    assert_eq!(from, "REJECTED");
    assert_eq!(to, "SUBMITTED");
    assert!(reason.contains("re-recorded"));
}

// ---------------------------------------------------------------------------
// 2. The full lifecycle on one record
// ---------------------------------------------------------------------------

#[test]
fn submit_review_expire_resubmit_reuses_the_record() {
    let (mut registry, vendor, durc) = seeded();

    // Submit with an issue date only; the 120-day catalog validity
    // fills the expiry.
    let id = registry
        .submit_document(vendor, durc, Some(d(2025, 1, 10)), None, None)
        .unwrap();
    let document = registry.get_document(id).unwrap();
    assert_eq!(document.status, DocumentStatus::Submitted);
    assert_eq!(document.expiry_date, Some(d(2025, 5, 10)));
    assert!(!document.verified);

    // Take it in review, then approve. Approval marks it verified.
    registry
        .review_document(id, DocumentStatus::UnderReview, None)
        .unwrap();
    registry
        .review_document(id, DocumentStatus::Approved, None)
        .unwrap();
    let document = registry.get_document(id).unwrap();
    assert_eq!(document.status, DocumentStatus::Approved);
    assert!(document.verified);

    // The June sweep catches the May expiry.
    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 1)), 1);
    assert_eq!(
        registry.get_document(id).unwrap().status,
        DocumentStatus::Expired
    );

    // Resubmitting the same document type reuses the expired record.
    let resubmitted = registry
        .submit_document(vendor, durc, Some(d(2025, 6, 2)), None, None)
        .unwrap();
    assert_eq!(resubmitted, id);
    let document = registry.get_document(id).unwrap();
    assert_eq!(document.status, DocumentStatus::Submitted);
    assert_eq!(document.expiry_date, Some(d(2025, 9, 30)));
}

#[test]
fn replacement_after_rejection_is_a_fresh_record() {
    let (mut registry, vendor, durc) = seeded();

    let first = registry
        .submit_document(vendor, durc, Some(d(2025, 1, 10)), None, None)
        .unwrap();
    registry
        .review_document(
            first,
            DocumentStatus::Rejected,
            Some("scansione illeggibile".to_string()),
        )
        .unwrap();

    // No decision can follow a rejection.
    let err = registry
        .review_document(first, DocumentStatus::Approved, None)
        .unwrap_err();
    assert!(matches!(err, albo_core::AlboError::Transition(_)));

    // A new submission gets a new id; the rejected record stays on
    // file with its reviewer notes.
    let second = registry
        .submit_document(vendor, durc, Some(d(2025, 2, 1)), None, None)
        .unwrap();
    assert_ne!(second, first);
    assert_eq!(registry.documents_for(vendor).len(), 2);

    let rejected = registry.get_document(first).unwrap();
    assert_eq!(rejected.status, DocumentStatus::Rejected);
    assert_eq!(rejected.notes.as_deref(), Some("scansione illeggibile"));
}

// ---------------------------------------------------------------------------
// 3. Sweep behavior
// ---------------------------------------------------------------------------

#[test]
fn sweep_is_idempotent() {
    let (mut registry, vendor, durc) = seeded();
    let id = registry
        .submit_document(vendor, durc, Some(d(2025, 1, 1)), Some(d(2025, 3, 31)), None)
        .unwrap();
    registry
        .review_document(id, DocumentStatus::Approved, None)
        .unwrap();

    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 1)), 1);
    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 1)), 0);
    assert_eq!(registry.recompute_expired_statuses(d(2025, 7, 1)), 0);
}

#[test]
fn sweep_never_touches_rejected_records() {
    let (mut registry, vendor, durc) = seeded();
    let id = registry
        .submit_document(vendor, durc, Some(d(2025, 1, 1)), Some(d(2025, 3, 31)), None)
        .unwrap();
    registry
        .review_document(id, DocumentStatus::Rejected, None)
        .unwrap();

    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 1)), 0);
    assert_eq!(
        registry.get_document(id).unwrap().status,
        DocumentStatus::Rejected
    );
}

#[test]
fn sweep_leaves_documents_expiring_on_the_sweep_day() {
    let (mut registry, vendor, durc) = seeded();
    let id = registry
        .submit_document(vendor, durc, Some(d(2025, 2, 1)), Some(d(2025, 6, 1)), None)
        .unwrap();

    // Valid through the end of the expiry day.
    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 1)), 0);
    assert_eq!(
        registry.get_document(id).unwrap().status,
        DocumentStatus::Submitted
    );

    assert_eq!(registry.recompute_expired_statuses(d(2025, 6, 2)), 1);
    assert_eq!(
        registry.get_document(id).unwrap().status,
        DocumentStatus::Expired
    );
}
