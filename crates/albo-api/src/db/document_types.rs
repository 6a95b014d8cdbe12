//! Document type catalog persistence operations.
//!
//! Mirrors the competence catalog module: the standard catalog is seeded
//! with `insert_if_absent` so first-boot ids survive restarts.

use albo_core::DocumentTypeId;
use albo_registry::DocumentTypeDef;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a document type definition unless its code is already present.
/// Returns `true` if a row was written.
pub async fn insert_if_absent(
    pool: &PgPool,
    record: &DocumentTypeDef,
) -> Result<bool, sqlx::Error> {
    let domain = super::encode_enum(&record.domain, "domain")?;
    let applies_to = super::encode_json(&record.applies_to, "applies_to")?;

    let result = sqlx::query(
        "INSERT INTO document_types (id, code, name, domain, mandatory, requires_renewal, default_validity_days, alert_days_before_expiry, active, applies_to)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         ON CONFLICT (code) DO NOTHING",
    )
    .bind(record.id.as_uuid())
    .bind(&record.code)
    .bind(&record.name)
    .bind(&domain)
    .bind(record.mandatory)
    .bind(record.requires_renewal)
    .bind(record.default_validity_days.map(|d| d as i32))
    .bind(record.alert_days_before_expiry)
    .bind(record.active)
    .bind(&applies_to)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all document type definitions from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<DocumentTypeDef>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentTypeRow>(
        "SELECT id, code, name, domain, mandatory, requires_renewal, default_validity_days, alert_days_before_expiry, active, applies_to
         FROM document_types ORDER BY code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(DocumentTypeRow::into_record)
        .collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DocumentTypeRow {
    id: Uuid,
    code: String,
    name: String,
    domain: String,
    mandatory: bool,
    requires_renewal: bool,
    default_validity_days: Option<i32>,
    alert_days_before_expiry: i64,
    active: bool,
    applies_to: serde_json::Value,
}

impl DocumentTypeRow {
    fn into_record(self) -> Option<DocumentTypeDef> {
        let domain = match super::decode_enum(&self.domain) {
            Ok(domain) => domain,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.domain,
                    error = %e,
                    "skipping document type row with unknown domain"
                );
                return None;
            }
        };

        let applies_to = match serde_json::from_value(self.applies_to) {
            Ok(applies_to) => applies_to,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    error = %e,
                    "skipping document type row with malformed applicability"
                );
                return None;
            }
        };

        let default_validity_days = match self.default_validity_days {
            None => None,
            Some(days) => match u32::try_from(days) {
                Ok(days) => Some(days),
                Err(_) => {
                    tracing::warn!(
                        id = %self.id,
                        days,
                        "skipping document type row with negative validity"
                    );
                    return None;
                }
            },
        };

        Some(DocumentTypeDef {
            id: DocumentTypeId::from_uuid(self.id),
            code: self.code,
            name: self.name,
            domain,
            mandatory: self.mandatory,
            requires_renewal: self.requires_renewal,
            default_validity_days,
            alert_days_before_expiry: self.alert_days_before_expiry,
            active: self.active,
            applies_to,
        })
    }
}
