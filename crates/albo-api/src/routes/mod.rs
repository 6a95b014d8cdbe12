//! # API Route Modules
//!
//! Route modules for the vendor register API surface:
//!
//! - `compliance` — per-vendor compliance reports as of a reference date.
//! - `dashboard` — multi-dimension aggregations and register-wide summaries.
//! - `vendors` — vendor administration, competence assignments, and
//!   document submission.
//! - `documents` — review decisions on submitted documents.
//! - `categories` — category hierarchy administration.
//! - `maintenance` — the expired-status recompute.

pub mod categories;
pub mod compliance;
pub mod dashboard;
pub mod documents;
pub mod maintenance;
pub mod vendors;

use albo_core::ValidationError;
use chrono::NaiveDate;

use crate::error::AppError;

/// Resolve an optional `as_of` parameter to a reference date.
///
/// Absent means today in UTC. A present value must be an ISO `YYYY-MM-DD`
/// date; anything else is a validation error, never a silent fallback.
pub(crate) fn resolve_as_of(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        None => Ok(chrono::Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
            AppError::from(ValidationError::InvalidDate {
                value: raw.to_string(),
                reason: e.to_string(),
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_as_of_defaults_to_today() {
        let today = chrono::Utc::now().date_naive();
        assert_eq!(resolve_as_of(None).unwrap(), today);
    }

    #[test]
    fn resolve_as_of_parses_iso_dates() {
        let date = resolve_as_of(Some("2025-06-15")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn resolve_as_of_rejects_garbage() {
        let err = resolve_as_of(Some("15/06/2025")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn resolve_as_of_rejects_impossible_dates() {
        assert!(resolve_as_of(Some("2025-02-30")).is_err());
    }
}
