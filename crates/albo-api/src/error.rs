//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps the albo-core error hierarchy to HTTP status codes and returns
//! JSON error bodies with a machine-readable code, a message, and
//! optional details. Never exposes internal error details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use albo_core::{AlboError, HierarchyError, StoreError, TransitionError, ValidationError};

/// Structured JSON error response body.
///
/// All error responses use this format. The `details` field carries
/// additional context for client errors and is omitted for 500-class
/// errors to prevent information leakage.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to HTTP status codes and structured JSON bodies.
/// Internal error details are logged but never returned to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (422).
    ///
    /// Normalized with `Validation` to 422 Unprocessable Entity: the
    /// client sent syntactically valid HTTP but semantically invalid
    /// content. Only malformed HTTP framing is 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure, missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure, insufficient permissions (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// Backing store not reachable (503). Compliance evaluation surfaces
    /// this instead of reporting an empty, falsely compliant result.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Unavailable { .. } => Self::ServiceUnavailable(err.to_string()),
            StoreError::StillReferenced { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl From<HierarchyError> for AppError {
    fn from(err: HierarchyError) -> Self {
        match &err {
            // Refused at write; the hierarchy is unchanged.
            HierarchyError::CycleDetected { .. } => Self::Conflict(err.to_string()),
            // A depth overrun means the stored hierarchy is corrupt.
            HierarchyError::DepthExceeded { .. } => Self::Internal(err.to_string()),
            HierarchyError::UnknownCategory(_) => Self::Validation(err.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        Self::Conflict(err.to_string())
    }
}

impl From<AlboError> for AppError {
    fn from(err: AlboError) -> Self {
        match err {
            AlboError::Store(e) => e.into(),
            AlboError::Hierarchy(e) => e.into(),
            AlboError::Validation(e) => e.into(),
            AlboError::Transition(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albo_core::{CategoryId, EntityKind};

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("missing vendor".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn validation_status_code() {
        let err = AppError::Validation("bad field".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn bad_request_status_code() {
        // Malformed JSON is 422, not 400: the HTTP framing was fine.
        let err = AppError::BadRequest("malformed JSON".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "BAD_REQUEST");
    }

    #[test]
    fn unauthorized_status_code() {
        let err = AppError::Unauthorized("no token".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[test]
    fn forbidden_status_code() {
        let err = AppError::Forbidden("insufficient role".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(code, "FORBIDDEN");
    }

    #[test]
    fn conflict_status_code() {
        let err = AppError::Conflict("already approved".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn store_not_found_maps_to_404() {
        let err: AppError = StoreError::NotFound {
            kind: EntityKind::Vendor,
            id: "abc".to_string(),
        }
        .into();
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_unavailable_maps_to_503() {
        let err: AppError = StoreError::Unavailable {
            reason: "connection refused".to_string(),
        }
        .into();
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn still_referenced_maps_to_409() {
        let err: AppError = StoreError::StillReferenced {
            kind: EntityKind::Category,
            id: "abc".to_string(),
            references: 2,
        }
        .into();
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn cycle_detected_maps_to_409() {
        let err: AppError = HierarchyError::CycleDetected {
            category: CategoryId::new(),
            requested_parent: CategoryId::new(),
        }
        .into();
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "CONFLICT");
    }

    #[test]
    fn unknown_category_maps_to_422() {
        let err: AppError = HierarchyError::UnknownCategory(CategoryId::new()).into();
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn depth_exceeded_maps_to_500() {
        let err: AppError = HierarchyError::DepthExceeded {
            start: CategoryId::new(),
            max_depth: 32,
        }
        .into();
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_transition_maps_to_409() {
        let err: AppError = TransitionError::InvalidTransition {
            from: "REJECTED".to_string(),
            to: "APPROVED".to_string(),
            reason: "terminal".to_string(),
        }
        .into();
        let (status, _) = err.status_and_code();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn albo_error_dispatches_by_sub_error() {
        let validation: AppError =
            AlboError::from(ValidationError::EmptyField { field: "code" }).into();
        assert_eq!(
            validation.status_and_code().0,
            StatusCode::UNPROCESSABLE_ENTITY
        );

        let transition: AppError = AlboError::from(TransitionError::InvalidTransition {
            from: "PENDING".to_string(),
            to: "EXPIRED".to_string(),
            reason: "not in the lifecycle table".to_string(),
        })
        .into();
        assert_eq!(transition.status_and_code().0, StatusCode::CONFLICT);
    }

    #[test]
    fn error_body_serializes() {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "TEST".to_string(),
                message: "test message".to_string(),
                details: None,
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("TEST"));
        assert!(json.contains("test message"));
        assert!(!json.contains("details")); // skipped when None
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("vendor 123".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("vendor 123"));
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_conflict_keeps_message() {
        let (status, body) =
            response_parts(AppError::Conflict("would create a cycle".into())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.message.contains("cycle"));
    }

    #[tokio::test]
    async fn into_response_internal_hides_details() {
        let (status, body) =
            response_parts(AppError::Internal("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "INTERNAL_ERROR");
        // The internal error message must NOT appear in the response body.
        assert!(
            !body.error.message.contains("db connection"),
            "internal error details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "An internal error occurred");
        assert!(body.error.details.is_none());
    }

    #[tokio::test]
    async fn into_response_service_unavailable_keeps_message() {
        let (status, body) =
            response_parts(AppError::ServiceUnavailable("store unavailable: down".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.error.message.contains("store unavailable"));
    }
}
