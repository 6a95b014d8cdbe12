//! Vendor persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `vendors` table.
//! Field validation (score ranges, date ordering, vendor code format) is
//! enforced at the application layer before a record reaches this module.

use albo_core::{CategoryId, VendorCode, VendorId};
use albo_registry::Vendor;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new vendor record.
pub async fn insert(pool: &PgPool, record: &Vendor) -> Result<(), sqlx::Error> {
    let vendor_type = record
        .vendor_type
        .as_ref()
        .map(|vt| super::encode_enum(vt, "vendor_type"))
        .transpose()?;
    let qualification_status =
        super::encode_enum(&record.qualification_status, "qualification_status")?;
    let risk_level = super::encode_enum(&record.risk_level, "risk_level")?;

    sqlx::query(
        "INSERT INTO vendors (id, vendor_code, company_name, vendor_type, category, service_type, region,
                              qualification_status, risk_level, qualification_score, qualification_date,
                              qualification_expiry, last_audit_date, next_audit_due, on_time_delivery_rate,
                              quality_rating_avg, average_response_time_hours, fulfillment_rate, active,
                              created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)",
    )
    .bind(record.id.as_uuid())
    .bind(record.vendor_code.as_str())
    .bind(&record.company_name)
    .bind(&vendor_type)
    .bind(record.category.map(|c| *c.as_uuid()))
    .bind(record.service_type.as_deref())
    .bind(record.region.as_deref())
    .bind(&qualification_status)
    .bind(&risk_level)
    .bind(record.qualification_score)
    .bind(record.qualification_date)
    .bind(record.qualification_expiry)
    .bind(record.last_audit_date)
    .bind(record.next_audit_due)
    .bind(record.on_time_delivery_rate)
    .bind(record.quality_rating_avg)
    .bind(record.average_response_time_hours)
    .bind(record.fulfillment_rate)
    .bind(record.active)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all vendors from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Vendor>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VendorRow>(
        "SELECT id, vendor_code, company_name, vendor_type, category, service_type, region,
                qualification_status, risk_level, qualification_score, qualification_date,
                qualification_expiry, last_audit_date, next_audit_due, on_time_delivery_rate,
                quality_rating_avg, average_response_time_hours, fulfillment_rate, active,
                created_at, updated_at
         FROM vendors ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(VendorRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VendorRow {
    id: Uuid,
    vendor_code: String,
    company_name: String,
    vendor_type: Option<String>,
    category: Option<Uuid>,
    service_type: Option<String>,
    region: Option<String>,
    qualification_status: String,
    risk_level: String,
    qualification_score: Option<f64>,
    qualification_date: Option<NaiveDate>,
    qualification_expiry: Option<NaiveDate>,
    last_audit_date: Option<NaiveDate>,
    next_audit_due: Option<NaiveDate>,
    on_time_delivery_rate: Option<f64>,
    quality_rating_avg: Option<f64>,
    average_response_time_hours: Option<f64>,
    fulfillment_rate: Option<f64>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl VendorRow {
    fn into_record(self) -> Option<Vendor> {
        let vendor_code = match VendorCode::new(&self.vendor_code) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.vendor_code,
                    error = %e,
                    "skipping vendor row with malformed vendor code"
                );
                return None;
            }
        };

        let vendor_type = match &self.vendor_type {
            None => None,
            Some(raw) => match super::decode_enum(raw) {
                Ok(vt) => Some(vt),
                Err(e) => {
                    tracing::warn!(
                        id = %self.id,
                        value = %raw,
                        error = %e,
                        "skipping vendor row with unknown vendor type"
                    );
                    return None;
                }
            },
        };

        let qualification_status = match super::decode_enum(&self.qualification_status) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.qualification_status,
                    error = %e,
                    "skipping vendor row with unknown qualification status"
                );
                return None;
            }
        };

        let risk_level = match super::decode_enum(&self.risk_level) {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.risk_level,
                    error = %e,
                    "skipping vendor row with unknown risk level"
                );
                return None;
            }
        };

        Some(Vendor {
            id: VendorId::from_uuid(self.id),
            vendor_code,
            company_name: self.company_name,
            vendor_type,
            category: self.category.map(CategoryId::from_uuid),
            service_type: self.service_type,
            region: self.region,
            qualification_status,
            risk_level,
            qualification_score: self.qualification_score,
            qualification_date: self.qualification_date,
            qualification_expiry: self.qualification_expiry,
            last_audit_date: self.last_audit_date,
            next_audit_due: self.next_audit_due,
            on_time_delivery_rate: self.on_time_delivery_rate,
            quality_rating_avg: self.quality_rating_avg,
            average_response_time_hours: self.average_response_time_hours,
            fulfillment_rate: self.fulfillment_rate,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
