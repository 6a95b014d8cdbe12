//! Competence catalog persistence operations.
//!
//! The standard catalog is seeded with `insert_if_absent`: `ON CONFLICT
//! (code) DO NOTHING` keeps the ids minted on first boot, so assignment
//! rows referencing them stay attached across restarts.

use albo_core::CompetenceId;
use albo_registry::CompetenceDef;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a competence definition unless its code is already present.
/// Returns `true` if a row was written.
pub async fn insert_if_absent(pool: &PgPool, record: &CompetenceDef) -> Result<bool, sqlx::Error> {
    let domain = super::encode_enum(&record.domain, "domain")?;
    let applies_to = super::encode_json(&record.applies_to, "applies_to")?;

    let result = sqlx::query(
        "INSERT INTO competences (id, code, name, description, domain, requires_certification, requires_renewal, renewal_period_months, mandatory, active, applies_to)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         ON CONFLICT (code) DO NOTHING",
    )
    .bind(record.id.as_uuid())
    .bind(&record.code)
    .bind(&record.name)
    .bind(record.description.as_deref())
    .bind(&domain)
    .bind(record.requires_certification)
    .bind(record.requires_renewal)
    .bind(record.renewal_period_months.map(|m| m as i32))
    .bind(record.mandatory)
    .bind(record.active)
    .bind(&applies_to)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all competence definitions from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<CompetenceDef>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CompetenceRow>(
        "SELECT id, code, name, description, domain, requires_certification, requires_renewal, renewal_period_months, mandatory, active, applies_to
         FROM competences ORDER BY code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(CompetenceRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CompetenceRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    domain: String,
    requires_certification: bool,
    requires_renewal: bool,
    renewal_period_months: Option<i32>,
    mandatory: bool,
    active: bool,
    applies_to: serde_json::Value,
}

impl CompetenceRow {
    fn into_record(self) -> Option<CompetenceDef> {
        let domain = match super::decode_enum(&self.domain) {
            Ok(domain) => domain,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.domain,
                    error = %e,
                    "skipping competence row with unknown domain"
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
                    "skipping competence row with malformed applicability"
                );
                return None;
            }
        };

        let renewal_period_months = match self.renewal_period_months {
            None => None,
            Some(months) => match u32::try_from(months) {
                Ok(months) => Some(months),
                Err(_) => {
                    tracing::warn!(
                        id = %self.id,
                        months,
                        "skipping competence row with negative renewal period"
                    );
                    return None;
                }
            },
        };

        Some(CompetenceDef {
            id: CompetenceId::from_uuid(self.id),
            code: self.code,
            name: self.name,
            description: self.description,
            domain,
            requires_certification: self.requires_certification,
            requires_renewal: self.requires_renewal,
            renewal_period_months,
            mandatory: self.mandatory,
            active: self.active,
            applies_to,
        })
    }
}
