//! Vendor document persistence operations.
//!
//! The table carries a `UNIQUE (vendor_id, document_type_id)` constraint
//! matching the register's one-record-per-type rule. The upsert replaces
//! the row id on conflict: when a rejected document is re-submitted the
//! register mints a fresh record id, and the stored row must follow it.

use albo_core::{DocumentId, DocumentStatus, DocumentTypeId, VendorId};
use albo_registry::VendorDocument;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert or update a vendor document by its `(vendor, document type)` key.
pub async fn upsert(pool: &PgPool, record: &VendorDocument) -> Result<(), sqlx::Error> {
    let status = super::encode_enum(&record.status, "status")?;

    sqlx::query(
        "INSERT INTO vendor_documents (id, vendor_id, document_type_id, issue_date, expiry_date, status, verified, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (vendor_id, document_type_id) DO UPDATE SET
             id = EXCLUDED.id,
             issue_date = EXCLUDED.issue_date,
             expiry_date = EXCLUDED.expiry_date,
             status = EXCLUDED.status,
             verified = EXCLUDED.verified,
             notes = EXCLUDED.notes",
    )
    .bind(record.id.as_uuid())
    .bind(record.vendor_id.as_uuid())
    .bind(record.document_type_id.as_uuid())
    .bind(record.issue_date)
    .bind(record.expiry_date)
    .bind(&status)
    .bind(record.verified)
    .bind(record.notes.as_deref())
    .execute(pool)
    .await?;

    Ok(())
}

/// Update the review outcome of a document. Returns `false` if the id
/// does not exist.
pub async fn update_status(
    pool: &PgPool,
    id: DocumentId,
    status: DocumentStatus,
    verified: bool,
    notes: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let status = super::encode_enum(&status, "status")?;

    let result = sqlx::query(
        "UPDATE vendor_documents SET status = $1, verified = $2, notes = COALESCE($3, notes)
         WHERE id = $4",
    )
    .bind(&status)
    .bind(verified)
    .bind(notes)
    .bind(id.as_uuid())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip every over-horizon document to `EXPIRED` directly in SQL.
///
/// The status list mirrors the in-memory expiry rule: only submitted,
/// under-review, and approved documents expire. Rejected stays rejected
/// and a pending placeholder has nothing to expire. Strict inequality:
/// a document expiring today is still valid today.
pub async fn mark_expired(pool: &PgPool, as_of: NaiveDate) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE vendor_documents SET status = 'EXPIRED'
         WHERE expiry_date IS NOT NULL
           AND expiry_date < $1
           AND status IN ('SUBMITTED', 'UNDER_REVIEW', 'APPROVED')",
    )
    .bind(as_of)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Load all vendor documents from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<VendorDocument>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, vendor_id, document_type_id, issue_date, expiry_date, status, verified, notes
         FROM vendor_documents ORDER BY vendor_id, document_type_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(DocumentRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    vendor_id: Uuid,
    document_type_id: Uuid,
    issue_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    status: String,
    verified: bool,
    notes: Option<String>,
}

impl DocumentRow {
    fn into_record(self) -> Option<VendorDocument> {
        let status = match super::decode_enum(&self.status) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.status,
                    error = %e,
                    "skipping vendor document row with unknown status"
                );
                return None;
            }
        };

        Some(VendorDocument {
            id: DocumentId::from_uuid(self.id),
            vendor_id: VendorId::from_uuid(self.vendor_id),
            document_type_id: DocumentTypeId::from_uuid(self.document_type_id),
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            status,
            verified: self.verified,
            notes: self.notes,
        })
    }
}
