//! # Database Persistence Layer
//!
//! Provides Postgres persistence for the vendor register via SQLx.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, every
//! register mutation is written through to PostgreSQL and the register is
//! hydrated from it on startup. When absent, the API operates in
//! in-memory-only mode (suitable for development and testing).
//!
//! Enum-valued columns store the serde string form (`"APPROVED"`,
//! `"sole_proprietor"`, ...). Decoding happens at the application layer:
//! a row whose stored string no longer parses is skipped with a warning
//! instead of taking the server down.

pub mod assignments;
pub mod categories;
pub mod competences;
pub mod document_types;
pub mod documents;
pub mod vendors;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Serialize an enum to the string stored in its TEXT column.
///
/// Errors instead of writing a fallback value: a serialization failure on
/// the write path must never plant a default that silently overwrites the
/// real state on the next restart.
pub(crate) fn encode_enum<T: serde::Serialize + std::fmt::Debug>(
    value: &T,
    column: &'static str,
) -> Result<String, sqlx::Error> {
    let json = serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, value = ?value, column, "failed to serialize enum column");
        sqlx::Error::Encode(Box::new(e))
    })?;
    json.as_str().map(String::from).ok_or_else(|| {
        tracing::error!(value = ?json, column, "enum column did not serialize to a JSON string");
        sqlx::Error::Encode(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "enum column did not serialize to a string",
        )))
    })
}

/// Serialize a structured field to JSON for a JSONB column.
pub(crate) fn encode_json<T: serde::Serialize>(
    value: &T,
    column: &'static str,
) -> Result<serde_json::Value, sqlx::Error> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, column, "failed to serialize JSONB column");
        sqlx::Error::Encode(Box::new(e))
    })
}

/// Decode an enum from the string stored in its TEXT column.
pub(crate) fn decode_enum<T: serde::de::DeserializeOwned>(
    raw: &str,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
}
