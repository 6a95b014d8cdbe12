//! Category persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `categories` table.
//! Hierarchy constraints (cycles, depth) are enforced at the application
//! layer by the category arena, not in SQL.

use albo_core::CategoryId;
use albo_registry::Category;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new category.
pub async fn insert(pool: &PgPool, record: &Category) -> Result<(), sqlx::Error> {
    let default_risk_level = super::encode_enum(&record.default_risk_level, "default_risk_level")?;

    sqlx::query(
        "INSERT INTO categories (id, code, name, parent, requires_certification, default_risk_level, sort_order, active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(record.id.as_uuid())
    .bind(&record.code)
    .bind(&record.name)
    .bind(record.parent.map(|p| *p.as_uuid()))
    .bind(record.requires_certification)
    .bind(&default_risk_level)
    .bind(record.sort_order)
    .bind(record.active)
    .execute(pool)
    .await?;

    Ok(())
}

/// Re-parent a category. Returns `false` if the id does not exist.
pub async fn update_parent(
    pool: &PgPool,
    id: CategoryId,
    parent: Option<CategoryId>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE categories SET parent = $1 WHERE id = $2")
        .bind(parent.map(|p| *p.as_uuid()))
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a category. Returns `false` if the id does not exist.
pub async fn delete(pool: &PgPool, id: CategoryId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all categories from the database on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, code, name, parent, requires_certification, default_risk_level, sort_order, active
         FROM categories ORDER BY sort_order, code",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(CategoryRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    code: String,
    name: String,
    parent: Option<Uuid>,
    requires_certification: bool,
    default_risk_level: String,
    sort_order: i32,
    active: bool,
}

impl CategoryRow {
    fn into_record(self) -> Option<Category> {
        let default_risk_level = match super::decode_enum(&self.default_risk_level) {
            Ok(level) => level,
            Err(e) => {
                tracing::warn!(
                    id = %self.id,
                    value = %self.default_risk_level,
                    error = %e,
                    "skipping category row with unknown risk level"
                );
                return None;
            }
        };

        Some(Category {
            id: CategoryId::from_uuid(self.id),
            code: self.code,
            name: self.name,
            parent: self.parent.map(CategoryId::from_uuid),
            requires_certification: self.requires_certification,
            default_risk_level,
            sort_order: self.sort_order,
            active: self.active,
        })
    }
}
