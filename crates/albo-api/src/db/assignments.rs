//! Competence assignment persistence operations.
//!
//! The table carries a `UNIQUE (vendor_id, competence_id)` constraint
//! matching the register's upsert key, so the write path is a single
//! `ON CONFLICT ... DO UPDATE` statement.

use albo_core::{AssignmentId, CompetenceId, VendorId};
use albo_registry::CompetenceAssignment;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert or update a competence assignment by its `(vendor, competence)` key.
pub async fn upsert(pool: &PgPool, record: &CompetenceAssignment) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO vendor_competences (id, vendor_id, competence_id, has_competence, has_certification, issue_date, expiry_date, verified)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (vendor_id, competence_id) DO UPDATE SET
             has_competence = EXCLUDED.has_competence,
             has_certification = EXCLUDED.has_certification,
             issue_date = EXCLUDED.issue_date,
             expiry_date = EXCLUDED.expiry_date,
             verified = EXCLUDED.verified",
    )
    .bind(record.id.as_uuid())
    .bind(record.vendor_id.as_uuid())
    .bind(record.competence_id.as_uuid())
    .bind(record.has_competence)
    .bind(record.has_certification)
    .bind(record.issue_date)
    .bind(record.expiry_date)
    .bind(record.verified)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all competence assignments from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CompetenceAssignment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AssignmentRow>(
        "SELECT id, vendor_id, competence_id, has_competence, has_certification, issue_date, expiry_date, verified
         FROM vendor_competences ORDER BY vendor_id, competence_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AssignmentRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    vendor_id: Uuid,
    competence_id: Uuid,
    has_competence: bool,
    has_certification: bool,
    issue_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
    verified: bool,
}

impl AssignmentRow {
    fn into_record(self) -> CompetenceAssignment {
        CompetenceAssignment {
            id: AssignmentId::from_uuid(self.id),
            vendor_id: VendorId::from_uuid(self.vendor_id),
            competence_id: CompetenceId::from_uuid(self.competence_id),
            has_competence: self.has_competence,
            has_certification: self.has_certification,
            issue_date: self.issue_date,
            expiry_date: self.expiry_date,
            verified: self.verified,
        }
    }
}
