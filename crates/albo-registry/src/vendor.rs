//! # Vendor Records
//!
//! The vendor master record: identity, classification, qualification
//! state, and the performance indicators the dashboards aggregate.
//! Qualification and audit deadlines are derived from an explicit `as_of`
//! date, never from the wall clock.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use albo_core::{
    CategoryId, QualificationStatus, RiskLevel, ValidationError, VendorCode, VendorId, VendorType,
};

const fn default_true() -> bool {
    true
}

fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A registered vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique identifier.
    pub id: VendorId,
    /// Immutable human-facing code.
    pub vendor_code: VendorCode,
    /// Registered company name.
    pub company_name: String,
    /// Legal form, when recorded.
    #[serde(default)]
    pub vendor_type: Option<VendorType>,
    /// Merceological category the vendor is classified under.
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Service type label, free-form.
    #[serde(default)]
    pub service_type: Option<String>,
    /// Operating region, free-form.
    #[serde(default)]
    pub region: Option<String>,
    /// Qualification status as recorded by the back office.
    pub qualification_status: QualificationStatus,
    /// Risk classification.
    pub risk_level: RiskLevel,
    /// Qualification score on a 0-100 scale.
    #[serde(default)]
    pub qualification_score: Option<f64>,
    /// Date the current qualification was granted.
    #[serde(default)]
    pub qualification_date: Option<NaiveDate>,
    /// Date the current qualification lapses.
    #[serde(default)]
    pub qualification_expiry: Option<NaiveDate>,
    /// Date of the last completed audit.
    #[serde(default)]
    pub last_audit_date: Option<NaiveDate>,
    /// Deadline for the next audit.
    #[serde(default)]
    pub next_audit_due: Option<NaiveDate>,
    /// Share of deliveries on time, 0-100.
    #[serde(default)]
    pub on_time_delivery_rate: Option<f64>,
    /// Average quality rating, 0-5.
    #[serde(default)]
    pub quality_rating_avg: Option<f64>,
    /// Average response time in hours.
    #[serde(default)]
    pub average_response_time_hours: Option<f64>,
    /// Contract fulfillment rate, 0-100.
    #[serde(default)]
    pub fulfillment_rate: Option<f64>,
    /// Inactive vendors are kept for history but excluded from the
    /// active dashboards.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Creation timestamp.
    #[serde(default = "now")]
    pub created_at: DateTime<Utc>,
    /// Last-write timestamp.
    #[serde(default = "now")]
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Create a pending, medium-risk, active vendor with a fresh id and
    /// generated code.
    pub fn new(company_name: impl Into<String>) -> Self {
        let created = now();
        Self {
            id: VendorId::new(),
            vendor_code: VendorCode::generate(),
            company_name: company_name.into(),
            vendor_type: None,
            category: None,
            service_type: None,
            region: None,
            qualification_status: QualificationStatus::Pending,
            risk_level: RiskLevel::Medium,
            qualification_score: None,
            qualification_date: None,
            qualification_expiry: None,
            last_audit_date: None,
            next_audit_due: None,
            on_time_delivery_rate: None,
            quality_rating_avg: None,
            average_response_time_hours: None,
            fulfillment_rate: None,
            active: true,
            created_at: created,
            updated_at: created,
        }
    }

    /// Set the category on a freshly built vendor.
    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the legal form on a freshly built vendor.
    pub fn with_vendor_type(mut self, vendor_type: VendorType) -> Self {
        self.vendor_type = Some(vendor_type);
        self
    }

    /// Set the service type on a freshly built vendor.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Set the region on a freshly built vendor.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the quality rating on a freshly built vendor.
    pub fn with_quality_rating(mut self, rating: f64) -> Self {
        self.quality_rating_avg = Some(rating);
        self
    }

    /// Set the fulfillment rate on a freshly built vendor.
    pub fn with_fulfillment_rate(mut self, rate: f64) -> Self {
        self.fulfillment_rate = Some(rate);
        self
    }

    /// Whether the vendor holds a live qualification at `as_of`:
    /// Approved, with an expiry recorded and strictly in the future.
    /// Approved with no expiry on file is treated as not qualified.
    pub fn is_qualified(&self, as_of: NaiveDate) -> bool {
        self.qualification_status == QualificationStatus::Approved
            && self.qualification_expiry.is_some_and(|expiry| expiry > as_of)
    }

    /// Whether the next audit deadline has passed at `as_of`.
    pub fn audit_overdue(&self, as_of: NaiveDate) -> bool {
        self.next_audit_due.is_some_and(|due| due < as_of)
    }

    /// Bump the last-write timestamp.
    pub fn touch(&mut self) {
        self.updated_at = now();
    }

    /// Check structural validity of the record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: "company_name",
            });
        }
        check_range("qualification_score", self.qualification_score, 0.0, 100.0)?;
        check_range(
            "on_time_delivery_rate",
            self.on_time_delivery_rate,
            0.0,
            100.0,
        )?;
        check_range("quality_rating_avg", self.quality_rating_avg, 0.0, 5.0)?;
        check_range("fulfillment_rate", self.fulfillment_rate, 0.0, 100.0)?;
        if let Some(hours) = self.average_response_time_hours {
            if hours < 0.0 {
                return Err(ValidationError::OutOfRange {
                    field: "average_response_time_hours",
                    value: hours,
                    min: 0.0,
                    max: f64::MAX,
                });
            }
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    if let Some(value) = value {
        if !(min..=max).contains(&value) {
            return Err(ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_vendor_defaults() {
        let vendor = Vendor::new("Rossi Impianti SRL");
        assert_eq!(vendor.qualification_status, QualificationStatus::Pending);
        assert_eq!(vendor.risk_level, RiskLevel::Medium);
        assert!(vendor.active);
        assert_eq!(vendor.vendor_code.as_str().len(), 10);
        assert_eq!(vendor.created_at, vendor.updated_at);
    }

    #[test]
    fn is_qualified_requires_approved_and_future_expiry() {
        let as_of = d(2025, 6, 15);
        let mut vendor = Vendor::new("Test");
        assert!(!vendor.is_qualified(as_of), "pending is never qualified");

        vendor.qualification_status = QualificationStatus::Approved;
        assert!(
            !vendor.is_qualified(as_of),
            "approved without expiry is not qualified"
        );

        vendor.qualification_expiry = Some(d(2025, 6, 15));
        assert!(
            !vendor.is_qualified(as_of),
            "expiry on the as-of day is not strictly after it"
        );

        vendor.qualification_expiry = Some(d(2025, 6, 16));
        assert!(vendor.is_qualified(as_of));

        vendor.qualification_status = QualificationStatus::Rejected;
        assert!(!vendor.is_qualified(as_of));
    }

    #[test]
    fn audit_overdue_only_when_due_date_is_past() {
        let as_of = d(2025, 6, 15);
        let mut vendor = Vendor::new("Test");
        assert!(!vendor.audit_overdue(as_of));
        vendor.next_audit_due = Some(d(2025, 6, 15));
        assert!(!vendor.audit_overdue(as_of));
        vendor.next_audit_due = Some(d(2025, 6, 14));
        assert!(vendor.audit_overdue(as_of));
    }

    #[test]
    fn validate_checks_ranges() {
        let mut vendor = Vendor::new("Test");
        vendor.quality_rating_avg = Some(5.0);
        vendor.fulfillment_rate = Some(100.0);
        vendor.on_time_delivery_rate = Some(0.0);
        assert!(vendor.validate().is_ok());

        vendor.quality_rating_avg = Some(5.1);
        assert!(matches!(
            vendor.validate().unwrap_err(),
            ValidationError::OutOfRange {
                field: "quality_rating_avg",
                ..
            }
        ));

        vendor.quality_rating_avg = Some(3.0);
        vendor.average_response_time_hours = Some(-1.0);
        assert!(vendor.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_name() {
        let vendor = Vendor::new("  ");
        assert_eq!(
            vendor.validate().unwrap_err(),
            ValidationError::EmptyField {
                field: "company_name"
            }
        );
    }

    #[test]
    fn serde_defaults_fill_optional_fields() {
        let json = format!(
            r#"{{
                "id": "{}",
                "vendor_code": "ABCDEF1234",
                "company_name": "Minimal SRL",
                "qualification_status": "PENDING",
                "risk_level": "LOW"
            }}"#,
            VendorId::new()
        );
        let vendor: Vendor = serde_json::from_str(&json).unwrap();
        assert!(vendor.active);
        assert_eq!(vendor.category, None);
        assert_eq!(vendor.region, None);
    }
}
