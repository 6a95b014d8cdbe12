//! # Document Review API
//!
//! The reviewer side of the document lifecycle:
//!
//! - `POST /v1/documents/{id}/review` — record a review decision.
//!
//! A decision is one of `UNDER_REVIEW` (take the submission in review),
//! `APPROVED`, or `REJECTED`. The lifecycle table decides whether the
//! step is legal from the record's current status; an illegal step is a
//! conflict and leaves the record untouched. Approval marks the record
//! verified.
//!
//! ## Authorization
//!
//! Requires back office or admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use albo_core::{DocumentId, DocumentStatus};

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::vendors::DocumentBody;
use crate::state::AppState;

/// Review decision request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewRequest {
    /// Target status: `UNDER_REVIEW`, `APPROVED`, or `REJECTED`.
    #[schema(value_type = String)]
    pub decision: DocumentStatus,
    /// Reviewer notes. When present they replace the stored notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for ReviewRequest {
    fn validate(&self) -> Result<(), String> {
        match self.decision {
            DocumentStatus::UnderReview
            | DocumentStatus::Approved
            | DocumentStatus::Rejected => Ok(()),
            other => Err(format!(
                "decision must be UNDER_REVIEW, APPROVED, or REJECTED, got {}",
                other.as_str()
            )),
        }
    }
}

/// Build the documents router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/documents/:id/review", post(review_document))
}

/// POST /v1/documents/{id}/review — Record a review decision.
#[utoipa::path(
    post,
    path = "/v1/documents/{id}/review",
    params(
        ("id" = Uuid, Path, description = "Document identifier"),
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Decision recorded", body = DocumentBody),
        (status = 404, description = "Document not found", body = crate::error::ErrorBody),
        (status = 409, description = "Decision not legal from the current status", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn review_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<DocumentBody>, AppError> {
    require_capability(&caller, Capability::ReviewDocuments)?;
    let req = extract_validated_json(body)?;

    let record = {
        let mut registry = state.registry.write();
        registry
            .review_document(DocumentId::from_uuid(id), req.decision, req.notes)?
            .clone()
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::documents::update_status(
            pool,
            record.id,
            record.status,
            record.verified,
            record.notes.as_deref(),
        )
        .await
        {
            tracing::error!(error = %e, document_id = %record.id, "failed to persist review decision");
            return Err(AppError::Internal(
                "decision recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(record.into()))
}
