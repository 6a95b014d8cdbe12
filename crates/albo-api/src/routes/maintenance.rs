//! # Maintenance API
//!
//! Back-office batch operations:
//!
//! - `POST /v1/maintenance/recompute-expired` — flip documents whose
//!   expiry date has passed to `EXPIRED`.
//!
//! The sweep is idempotent: a second run with the same reference date
//! reports zero updates. With a database configured the same rule is
//! applied there in one statement, so stored rows match the in-memory
//! register.
//!
//! ## Authorization
//!
//! Requires back office or admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::resolve_as_of;
use crate::state::AppState;

/// Recompute request. An empty object is valid.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecomputeRequest {
    /// Reference date for the sweep. Defaults to today.
    #[serde(default)]
    pub as_of: Option<String>,
}

impl Validate for RecomputeRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Recompute response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecomputeResponse {
    /// Number of documents flipped to `EXPIRED`.
    pub updated: usize,
    /// Reference date the sweep used.
    pub as_of: NaiveDate,
}

/// Build the maintenance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/maintenance/recompute-expired", post(recompute_expired))
}

/// POST /v1/maintenance/recompute-expired — Run the expiry sweep.
#[utoipa::path(
    post,
    path = "/v1/maintenance/recompute-expired",
    request_body = RecomputeRequest,
    responses(
        (status = 200, description = "Sweep completed", body = RecomputeResponse),
        (status = 422, description = "Malformed reference date", body = crate::error::ErrorBody),
    ),
    tag = "maintenance"
)]
async fn recompute_expired(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<RecomputeRequest>, JsonRejection>,
) -> Result<Json<RecomputeResponse>, AppError> {
    require_capability(&caller, Capability::RunMaintenance)?;
    let req = extract_validated_json(body)?;
    let as_of = resolve_as_of(req.as_of.as_deref())?;

    let updated = {
        let mut registry = state.registry.write();
        registry.recompute_expired_statuses(as_of)
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::documents::mark_expired(pool, as_of).await {
            tracing::error!(error = %e, %as_of, "failed to persist expiry sweep");
            return Err(AppError::Internal(
                "sweep applied in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(RecomputeResponse { updated, as_of }))
}
