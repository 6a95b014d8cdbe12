//! # Temporal Helpers
//!
//! Date arithmetic and parsing for expiry evaluation. All evaluation
//! functions take an explicit `as_of` date; [`today_utc`] is the only
//! clock read in the workspace and is called at process boundaries only
//! (HTTP handlers, CLI argument defaults), never inside evaluation.

use chrono::{NaiveDate, Utc};

use crate::error::ValidationError;

/// Format accepted by [`parse_date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Signed number of days from `from` to `to`. Negative when `to` is in
/// the past relative to `from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| ValidationError::InvalidDate {
        value: value.to_string(),
        reason: err.to_string(),
    })
}

/// Today's date in UTC. Boundary use only.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Validate that an optional issue date precedes its expiry date.
///
/// Records with only one of the two dates (or neither) pass; the check
/// only fires when both are present and out of order or equal.
pub fn check_date_range(
    issue_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    if let (Some(issue), Some(expiry)) = (issue_date, expiry_date) {
        if issue >= expiry {
            return Err(ValidationError::InvalidDateRange {
                issue_date: issue,
                expiry_date: expiry,
            });
        }
    }
    Ok(())
}
