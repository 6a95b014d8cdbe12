//! # Compliance Report API
//!
//! `GET /v1/compliance/{vendor_id}` evaluates one vendor's requirement
//! position at an explicit reference date: what is required, what is
//! missing, and what is expired or about to expire.
//!
//! ## Authorization
//!
//! Every role may call the endpoint, but a vendor-role caller is
//! restricted to the vendor its token is bound to.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use albo_core::VendorId;
use albo_engine::{evaluate, ComplianceReport, RequirementRef, RequirementResolver, VendorSnapshot};

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::routes::resolve_as_of;
use crate::state::AppState;

/// Query parameters for the compliance endpoint.
#[derive(Debug, Deserialize)]
pub struct ComplianceQueryParams {
    /// Reference date (`YYYY-MM-DD`). Defaults to today in UTC.
    pub as_of: Option<String>,
}

/// A catalog entry referenced from a report bucket.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequirementRefBody {
    /// Catalog id of the entry.
    pub id: Uuid,
    /// Business code of the entry.
    pub code: String,
    /// Human-readable name of the entry.
    pub name: String,
    /// Whether the catalog marks the entry mandatory.
    pub mandatory: bool,
}

impl From<RequirementRef> for RequirementRefBody {
    fn from(entry: RequirementRef) -> Self {
        Self {
            id: entry.id,
            code: entry.code,
            name: entry.name,
            mandatory: entry.mandatory,
        }
    }
}

/// Compliance report response for a single vendor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComplianceReportBody {
    /// Vendor the report is about.
    pub vendor_id: Uuid,
    /// The vendor's code, for log and display use.
    pub vendor_code: String,
    /// Evaluation date.
    pub as_of: NaiveDate,
    /// Required competences with no possessed record.
    pub missing_competences: Vec<RequirementRefBody>,
    /// Required document types with no possessed record.
    pub missing_documents: Vec<RequirementRefBody>,
    /// Possessed competences whose expiry date has passed.
    pub expired_competences: Vec<RequirementRefBody>,
    /// Possessed documents whose expiry date has passed.
    pub expired_documents: Vec<RequirementRefBody>,
    /// Possessed competences inside the alert window.
    pub expiring_competences: Vec<RequirementRefBody>,
    /// Possessed documents inside the alert window.
    pub expiring_documents: Vec<RequirementRefBody>,
    /// Verdict: nothing missing and nothing mandatory expired.
    pub is_fully_compliant: bool,
}

impl From<ComplianceReport> for ComplianceReportBody {
    fn from(report: ComplianceReport) -> Self {
        fn refs(entries: Vec<RequirementRef>) -> Vec<RequirementRefBody> {
            entries.into_iter().map(Into::into).collect()
        }
        Self {
            vendor_id: *report.vendor_id.as_uuid(),
            vendor_code: report.vendor_code,
            as_of: report.as_of,
            missing_competences: refs(report.missing_competences),
            missing_documents: refs(report.missing_documents),
            expired_competences: refs(report.expired_competences),
            expired_documents: refs(report.expired_documents),
            expiring_competences: refs(report.expiring_competences),
            expiring_documents: refs(report.expiring_documents),
            is_fully_compliant: report.is_fully_compliant,
        }
    }
}

/// Build the compliance router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/compliance/:vendor_id", get(get_compliance))
}

/// GET /v1/compliance/{vendor_id} — Evaluate a vendor's compliance.
///
/// Resolution walks the category hierarchy for applicable requirements;
/// the verdict is false while anything required is missing or anything
/// mandatory is expired. An evaluation failure surfaces as an error,
/// never as an empty, falsely compliant report.
#[utoipa::path(
    get,
    path = "/v1/compliance/{vendor_id}",
    params(
        ("vendor_id" = Uuid, Path, description = "Vendor to evaluate"),
        ("as_of" = Option<String>, Query, description = "Reference date (YYYY-MM-DD), defaults to today"),
    ),
    responses(
        (status = 200, description = "Compliance report", body = ComplianceReportBody),
        (status = 403, description = "Caller may not read this vendor", body = crate::error::ErrorBody),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid as_of date", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn get_compliance(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(vendor_id): Path<Uuid>,
    Query(params): Query<ComplianceQueryParams>,
) -> Result<Json<ComplianceReportBody>, AppError> {
    require_capability(&caller, Capability::ViewComplianceReport)?;
    if !caller.can_view_vendor(vendor_id) {
        return Err(AppError::Forbidden(
            "a vendor token can only read its own compliance report".to_string(),
        ));
    }
    let as_of = resolve_as_of(params.as_of.as_deref())?;

    let registry = state.registry.read();
    let resolver = RequirementResolver::from_registry(&registry);
    let snapshot = VendorSnapshot::from_registry(&registry, VendorId::from_uuid(vendor_id))?;
    let report = evaluate(&resolver, &snapshot, as_of)?;

    Ok(Json(report.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use albo_registry::{Registry, Vendor};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn admin() -> CallerIdentity {
        CallerIdentity {
            role: Role::Admin,
            vendor_id: None,
        }
    }

    fn seeded_state() -> (AppState, Uuid) {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        (AppState::with_registry(registry), *vendor_id.as_uuid())
    }

    fn test_app(state: AppState, identity: CallerIdentity) -> Router {
        router().layer(axum::Extension(identity)).with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn report_returns_200_for_known_vendor() {
        let (state, vendor_id) = seeded_state();
        let app = test_app(state, admin());

        let req = Request::builder()
            .uri(format!("/v1/compliance/{vendor_id}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let report: ComplianceReportBody = body_json(resp).await;
        assert_eq!(report.vendor_id, vendor_id);
        // A fresh vendor holds nothing, so the mandatory globals are missing.
        assert!(!report.is_fully_compliant);
        assert!(!report.missing_documents.is_empty());
    }

    #[tokio::test]
    async fn report_honors_as_of_param() {
        let (state, vendor_id) = seeded_state();
        let app = test_app(state, admin());

        let req = Request::builder()
            .uri(format!("/v1/compliance/{vendor_id}?as_of=2025-03-01"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let report: ComplianceReportBody = body_json(resp).await;
        assert_eq!(
            report.as_of,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn report_rejects_malformed_as_of() {
        let (state, vendor_id) = seeded_state();
        let app = test_app(state, admin());

        let req = Request::builder()
            .uri(format!("/v1/compliance/{vendor_id}?as_of=01-03-2025"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unknown_vendor_is_404() {
        let (state, _) = seeded_state();
        let app = test_app(state, admin());

        let req = Request::builder()
            .uri(format!("/v1/compliance/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn vendor_token_reads_own_report() {
        let (state, vendor_id) = seeded_state();
        let identity = CallerIdentity {
            role: Role::Vendor,
            vendor_id: Some(vendor_id),
        };
        let app = test_app(state, identity);

        let req = Request::builder()
            .uri(format!("/v1/compliance/{vendor_id}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn vendor_token_cannot_read_other_vendors() {
        let (state, vendor_id) = seeded_state();
        let identity = CallerIdentity {
            role: Role::Vendor,
            vendor_id: Some(Uuid::new_v4()),
        };
        let app = test_app(state, identity);

        let req = Request::builder()
            .uri(format!("/v1/compliance/{vendor_id}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn router_builds() {
        let _r = router();
    }
}
