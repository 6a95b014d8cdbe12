//! # Custom Extractors & Validation
//!
//! The [`Validate`] trait for request DTOs plus helpers to extract and
//! validate JSON bodies in handlers. Registry-level invariants (unique
//! keys, lifecycle rules) stay in `albo-registry`; these checks cover
//! what a request must satisfy before it touches the register at all.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Trait for request types that check business rules beyond what serde
/// deserialization enforces.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
///
/// Handlers take the body as `Result<Json<T>, JsonRejection>` and call
/// this (or [`extract_validated_json`]) so malformed bodies become a
/// structured 422 instead of axum's default plain-text rejection.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe {
        ok: bool,
    }

    impl Validate for Probe {
        fn validate(&self) -> Result<(), String> {
            if self.ok {
                Ok(())
            } else {
                Err("probe failed".to_string())
            }
        }
    }

    #[test]
    fn extract_json_unwraps_the_body() {
        let value = extract_json(Ok(Json(7u32))).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn validated_json_runs_the_check() {
        let err = extract_validated_json(Ok(Json(Probe { ok: false }))).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "probe failed"));

        assert!(extract_validated_json(Ok(Json(Probe { ok: true }))).is_ok());
    }
}
