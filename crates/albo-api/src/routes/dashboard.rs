//! # Dashboard API
//!
//! Read-only aggregations over the register:
//!
//! - `GET /v1/dashboard/stats` — vendor counts grouped along the
//!   requested dimensions (all of them when the parameter is omitted).
//! - `GET /v1/dashboard/summary` — headline vendor counters.
//! - `GET /v1/dashboard/documents` — headline document counters.
//!
//! ## Authorization
//!
//! Requires back office or admin.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use albo_engine::{
    aggregate, document_summary, parse_dimensions, summarize, BucketCount, DashboardInput,
    DocumentSummary, VendorSummary,
};

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::routes::resolve_as_of;
use crate::state::AppState;

/// Query parameters for the stats endpoint.
#[derive(Debug, Deserialize)]
pub struct StatsQueryParams {
    /// Comma-separated dimension list, e.g. `category,region,risk`.
    /// Omitted or empty means every dimension.
    pub dimensions: Option<String>,
}

/// Query parameters for the summary endpoints.
#[derive(Debug, Deserialize)]
pub struct SummaryQueryParams {
    /// Reference date (`YYYY-MM-DD`). Defaults to today in UTC.
    pub as_of: Option<String>,
}

/// One bucket of a grouped count.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BucketCountBody {
    /// Bucket label.
    pub key: String,
    /// Number of vendors (or claims) in the bucket.
    pub count: usize,
}

impl From<BucketCount> for BucketCountBody {
    fn from(bucket: BucketCount) -> Self {
        Self {
            key: bucket.key,
            count: bucket.count,
        }
    }
}

/// Headline vendor counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorSummaryBody {
    /// All vendor records.
    pub total: usize,
    /// Vendors flagged active.
    pub active: usize,
    /// Vendors with an approved qualification.
    pub approved: usize,
    /// Vendors still awaiting qualification.
    pub pending_qualification: usize,
    /// Vendors assessed high risk.
    pub high_risk: usize,
    /// Vendors approved with an unexpired qualification at the reporting date.
    pub qualified: usize,
    /// Vendors whose next audit date has passed.
    pub audit_overdue: usize,
}

impl From<VendorSummary> for VendorSummaryBody {
    fn from(summary: VendorSummary) -> Self {
        Self {
            total: summary.total,
            active: summary.active,
            approved: summary.approved,
            pending_qualification: summary.pending_qualification,
            high_risk: summary.high_risk,
            qualified: summary.qualified,
            audit_overdue: summary.audit_overdue,
        }
    }
}

/// Headline document counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentSummaryBody {
    /// Documents waiting on a review decision.
    pub pending_review: usize,
    /// Possessed documents inside their alert window at the reporting date.
    pub expiring_soon: usize,
    /// All documents, counted per stored status.
    pub by_status: BTreeMap<String, usize>,
}

impl From<DocumentSummary> for DocumentSummaryBody {
    fn from(summary: DocumentSummary) -> Self {
        Self {
            pending_review: summary.pending_review,
            expiring_soon: summary.expiring_soon,
            by_status: summary.by_status,
        }
    }
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/dashboard/stats", get(dashboard_stats))
        .route("/v1/dashboard/summary", get(dashboard_summary))
        .route("/v1/dashboard/documents", get(dashboard_documents))
}

/// GET /v1/dashboard/stats — Grouped vendor counts.
///
/// Buckets are ordered by descending count (ties broken by key); the
/// quality and fulfillment dimensions keep their natural bucket order.
/// Vendors without a value land in the unspecified bucket, which sorts
/// last.
#[utoipa::path(
    get,
    path = "/v1/dashboard/stats",
    params(
        ("dimensions" = Option<String>, Query, description = "Comma-separated dimensions; all when omitted"),
    ),
    responses(
        (status = 200, description = "Buckets keyed by dimension", body = Object),
        (status = 422, description = "Unknown dimension", body = crate::error::ErrorBody),
    ),
    tag = "dashboard"
)]
async fn dashboard_stats(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<StatsQueryParams>,
) -> Result<Json<BTreeMap<String, Vec<BucketCountBody>>>, AppError> {
    require_capability(&caller, Capability::ViewDashboards)?;
    let dimensions = parse_dimensions(params.dimensions.as_deref().unwrap_or(""))?;

    let registry = state.registry.read();
    let input = DashboardInput::from_registry(&registry);
    let report = aggregate(&input, &dimensions);

    let body = report
        .into_iter()
        .map(|(dimension, buckets)| {
            (
                dimension.as_str().to_string(),
                buckets.into_iter().map(Into::into).collect(),
            )
        })
        .collect();

    Ok(Json(body))
}

/// GET /v1/dashboard/summary — Headline vendor counters.
#[utoipa::path(
    get,
    path = "/v1/dashboard/summary",
    params(
        ("as_of" = Option<String>, Query, description = "Reference date (YYYY-MM-DD), defaults to today"),
    ),
    responses(
        (status = 200, description = "Vendor summary", body = VendorSummaryBody),
    ),
    tag = "dashboard"
)]
async fn dashboard_summary(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<SummaryQueryParams>,
) -> Result<Json<VendorSummaryBody>, AppError> {
    require_capability(&caller, Capability::ViewDashboards)?;
    let as_of = resolve_as_of(params.as_of.as_deref())?;

    let registry = state.registry.read();
    let input = DashboardInput::from_registry(&registry);
    let summary = summarize(&input, as_of);

    Ok(Json(summary.into()))
}

/// GET /v1/dashboard/documents — Headline document counters.
#[utoipa::path(
    get,
    path = "/v1/dashboard/documents",
    params(
        ("as_of" = Option<String>, Query, description = "Reference date (YYYY-MM-DD), defaults to today"),
    ),
    responses(
        (status = 200, description = "Document summary", body = DocumentSummaryBody),
    ),
    tag = "dashboard"
)]
async fn dashboard_documents(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<SummaryQueryParams>,
) -> Result<Json<DocumentSummaryBody>, AppError> {
    require_capability(&caller, Capability::ViewDashboards)?;
    let as_of = resolve_as_of(params.as_of.as_deref())?;

    let registry = state.registry.read();
    let summary = document_summary(&registry, as_of);

    Ok(Json(summary.into()))
}
