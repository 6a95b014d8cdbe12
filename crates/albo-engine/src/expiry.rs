//! # Expiry Classification
//!
//! The one place that decides whether a dated record is still good. All
//! of compliance, the dashboards, and the batch expiry job call through
//! here, so "expired" means the same thing everywhere: a record is valid
//! through the end of its expiry day and expired strictly after it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use albo_core::temporal::days_between;

/// Days before expiry at which a competence counts as expiring soon.
pub const COMPETENCE_EXPIRING_SOON_DAYS: i64 = 30;

/// Days before expiry at which a competence enters the early-warning
/// tier.
pub const COMPETENCE_EXPIRING_DAYS: i64 = 90;

/// Validity of a dated record at a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryStatus {
    /// The record carries no expiry date and never lapses.
    NoExpiry,
    /// The expiry date is comfortably in the future.
    Valid,
    /// The expiry date falls within the alert window.
    ExpiringSoon,
    /// The expiry date has passed.
    Expired,
}

impl ExpiryStatus {
    /// Monotone severity rank: classification never gets less severe as
    /// `as_of` advances.
    pub fn severity(&self) -> u8 {
        match self {
            Self::NoExpiry => 0,
            Self::Valid => 1,
            Self::ExpiringSoon => 2,
            Self::Expired => 3,
        }
    }

    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoExpiry => "NO_EXPIRY",
            Self::Valid => "VALID",
            Self::ExpiringSoon => "EXPIRING_SOON",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Competence validity with the finer early-warning tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetenceExpiryStatus {
    /// The competence carries no expiry date and never lapses.
    NoExpiry,
    /// More than [`COMPETENCE_EXPIRING_DAYS`] of validity left.
    Valid,
    /// Within [`COMPETENCE_EXPIRING_DAYS`] of expiry.
    Expiring,
    /// Within [`COMPETENCE_EXPIRING_SOON_DAYS`] of expiry.
    ExpiringSoon,
    /// The expiry date has passed.
    Expired,
}

impl CompetenceExpiryStatus {
    /// Monotone severity rank.
    pub fn severity(&self) -> u8 {
        match self {
            Self::NoExpiry => 0,
            Self::Valid => 1,
            Self::Expiring => 2,
            Self::ExpiringSoon => 3,
            Self::Expired => 4,
        }
    }

    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoExpiry => "NO_EXPIRY",
            Self::Valid => "VALID",
            Self::Expiring => "EXPIRING",
            Self::ExpiringSoon => "EXPIRING_SOON",
            Self::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for CompetenceExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a record's expiry date against `as_of` with the given alert
/// window.
///
/// An expiry date equal to `as_of` is not yet expired (valid through the
/// end of that day); with a non-negative window it classifies as
/// [`ExpiryStatus::ExpiringSoon`].
pub fn classify(
    expiry_date: Option<NaiveDate>,
    alert_window_days: i64,
    as_of: NaiveDate,
) -> ExpiryStatus {
    let Some(expiry) = expiry_date else {
        return ExpiryStatus::NoExpiry;
    };
    if expiry < as_of {
        return ExpiryStatus::Expired;
    }
    if days_between(as_of, expiry) <= alert_window_days {
        return ExpiryStatus::ExpiringSoon;
    }
    ExpiryStatus::Valid
}

/// Classify a competence expiry date with the fixed 30/90-day tiers.
pub fn classify_competence(
    expiry_date: Option<NaiveDate>,
    as_of: NaiveDate,
) -> CompetenceExpiryStatus {
    let Some(expiry) = expiry_date else {
        return CompetenceExpiryStatus::NoExpiry;
    };
    if expiry < as_of {
        return CompetenceExpiryStatus::Expired;
    }
    let days_left = days_between(as_of, expiry);
    if days_left <= COMPETENCE_EXPIRING_SOON_DAYS {
        return CompetenceExpiryStatus::ExpiringSoon;
    }
    if days_left <= COMPETENCE_EXPIRING_DAYS {
        return CompetenceExpiryStatus::Expiring;
    }
    CompetenceExpiryStatus::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn as_of() -> NaiveDate {
        d(2025, 6, 15)
    }

    #[test]
    fn no_date_never_expires() {
        assert_eq!(classify(None, 30, as_of()), ExpiryStatus::NoExpiry);
        assert_eq!(
            classify_competence(None, as_of()),
            CompetenceExpiryStatus::NoExpiry
        );
    }

    #[test]
    fn past_date_is_expired() {
        assert_eq!(
            classify(Some(d(2025, 6, 14)), 30, as_of()),
            ExpiryStatus::Expired
        );
        assert_eq!(
            classify(Some(d(2020, 1, 1)), 0, as_of()),
            ExpiryStatus::Expired
        );
    }

    #[test]
    fn expiry_day_itself_is_not_expired() {
        assert_eq!(
            classify(Some(as_of()), 30, as_of()),
            ExpiryStatus::ExpiringSoon
        );
        assert_eq!(classify(Some(as_of()), 0, as_of()), ExpiryStatus::ExpiringSoon);
    }

    #[test]
    fn window_boundary_is_inclusive() {
        // 30 days out with a 30-day window: inside
        assert_eq!(
            classify(Some(as_of() + Duration::days(30)), 30, as_of()),
            ExpiryStatus::ExpiringSoon
        );
        // 31 days out: outside
        assert_eq!(
            classify(Some(as_of() + Duration::days(31)), 30, as_of()),
            ExpiryStatus::Valid
        );
    }

    #[test]
    fn five_days_out_with_default_window_is_expiring_soon() {
        assert_eq!(
            classify(Some(as_of() + Duration::days(5)), 30, as_of()),
            ExpiryStatus::ExpiringSoon
        );
    }

    #[test]
    fn competence_tiers() {
        let cases = [
            (1, CompetenceExpiryStatus::ExpiringSoon),
            (30, CompetenceExpiryStatus::ExpiringSoon),
            (31, CompetenceExpiryStatus::Expiring),
            (90, CompetenceExpiryStatus::Expiring),
            (91, CompetenceExpiryStatus::Valid),
            (365, CompetenceExpiryStatus::Valid),
            (-1, CompetenceExpiryStatus::Expired),
        ];
        for (offset, expected) in cases {
            assert_eq!(
                classify_competence(Some(as_of() + Duration::days(offset)), as_of()),
                expected,
                "offset {offset}"
            );
        }
    }

    #[test]
    fn severity_orders_match_variant_order() {
        assert!(ExpiryStatus::NoExpiry.severity() < ExpiryStatus::Valid.severity());
        assert!(ExpiryStatus::Valid.severity() < ExpiryStatus::ExpiringSoon.severity());
        assert!(ExpiryStatus::ExpiringSoon.severity() < ExpiryStatus::Expired.severity());
        assert!(
            CompetenceExpiryStatus::Expiring.severity()
                < CompetenceExpiryStatus::ExpiringSoon.severity()
        );
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&ExpiryStatus::ExpiringSoon).unwrap(),
            "\"EXPIRING_SOON\""
        );
        assert_eq!(
            serde_json::to_string(&CompetenceExpiryStatus::NoExpiry).unwrap(),
            "\"NO_EXPIRY\""
        );
    }

    proptest! {
        // moving the evaluation day forward never makes a record look
        // healthier
        #[test]
        fn classification_is_monotone_in_as_of(
            expiry_offset in -500i64..500,
            window in 0i64..120,
            first_offset in -500i64..500,
            advance in 0i64..500,
        ) {
            let expiry = as_of() + Duration::days(expiry_offset);
            let earlier = as_of() + Duration::days(first_offset);
            let later = earlier + Duration::days(advance);
            let before = classify(Some(expiry), window, earlier);
            let after = classify(Some(expiry), window, later);
            prop_assert!(before.severity() <= after.severity());
        }

        #[test]
        fn competence_classification_is_monotone_in_as_of(
            expiry_offset in -500i64..500,
            first_offset in -500i64..500,
            advance in 0i64..500,
        ) {
            let expiry = as_of() + Duration::days(expiry_offset);
            let earlier = as_of() + Duration::days(first_offset);
            let later = earlier + Duration::days(advance);
            let before = classify_competence(Some(expiry), earlier);
            let after = classify_competence(Some(expiry), later);
            prop_assert!(before.severity() <= after.severity());
        }

        #[test]
        fn widening_the_window_never_hides_expiry(
            expiry_offset in -200i64..400,
            window in 0i64..60,
            extra in 0i64..60,
        ) {
            let expiry = Some(as_of() + Duration::days(expiry_offset));
            let narrow = classify(expiry, window, as_of());
            let wide = classify(expiry, window + extra, as_of());
            // widening can only move Valid -> ExpiringSoon
            prop_assert!(wide.severity() >= narrow.severity());
            prop_assert_eq!(
                narrow == ExpiryStatus::Expired,
                wide == ExpiryStatus::Expired
            );
        }
    }
}
