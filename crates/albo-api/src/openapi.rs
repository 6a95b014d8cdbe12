//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Static bearer token, `{role}:{vendor_id}:{secret}` or the bare \
                             secret for admin. Set via the AUTH_TOKEN env var.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
///
/// Registers all utoipa-documented routes, schemas, tags, and security
/// definitions. Serves as the single source of truth for integrators.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Albo API — Vendor Qualification Register",
        version = "0.3.7",
        description = "Axum API services for the Albo vendor register: supplier qualification above the compliance engine.\n\nProvides:\n- **Compliance reports** — per-vendor missing, expired, and expiring requirements at a reference date\n- **Vendor administration** — registration, competence claims, document submission\n- **Document review** — the submitted → approved/rejected lifecycle\n- **Category hierarchy** — the merceological forest with cycle-checked moves\n- **Dashboards** — register aggregation by category, region, risk, and more\n- **Maintenance** — the idempotent document expiry sweep\n\nAuthentication: Bearer token via `Authorization: Bearer <token>` header.\nAll `/v1/*` endpoints require authentication. Health probes (`/health/*`) are unauthenticated.",
        license(name = "BUSL-1.1"),
        contact(name = "Albo Platform", url = "https://github.com/albo-platform/stack")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Compliance ───────────────────────────────────────────────────
        crate::routes::compliance::get_compliance,
        // ── Dashboards ───────────────────────────────────────────────────
        crate::routes::dashboard::dashboard_stats,
        crate::routes::dashboard::dashboard_summary,
        crate::routes::dashboard::dashboard_documents,
        // ── Vendors ──────────────────────────────────────────────────────
        crate::routes::vendors::list_vendors,
        crate::routes::vendors::get_vendor,
        crate::routes::vendors::create_vendor,
        crate::routes::vendors::upsert_assignment,
        crate::routes::vendors::submit_document,
        // ── Document review ──────────────────────────────────────────────
        crate::routes::documents::review_document,
        // ── Categories ───────────────────────────────────────────────────
        crate::routes::categories::list_categories,
        crate::routes::categories::category_tree,
        crate::routes::categories::create_category,
        crate::routes::categories::update_parent,
        crate::routes::categories::delete_category,
        // ── Maintenance ──────────────────────────────────────────────────
        crate::routes::maintenance::recompute_expired,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Compliance DTOs ─────────────────────────────────────────
            crate::routes::compliance::RequirementRefBody,
            crate::routes::compliance::ComplianceReportBody,
            // ── Dashboard DTOs ──────────────────────────────────────────
            crate::routes::dashboard::BucketCountBody,
            crate::routes::dashboard::VendorSummaryBody,
            crate::routes::dashboard::DocumentSummaryBody,
            // ── Vendor DTOs ─────────────────────────────────────────────
            crate::routes::vendors::CreateVendorRequest,
            crate::routes::vendors::UpsertAssignmentRequest,
            crate::routes::vendors::SubmitDocumentRequest,
            crate::routes::vendors::VendorBody,
            crate::routes::vendors::VendorListResponse,
            crate::routes::vendors::AssignmentBody,
            crate::routes::vendors::DocumentBody,
            // ── Document review DTOs ────────────────────────────────────
            crate::routes::documents::ReviewRequest,
            // ── Category DTOs ───────────────────────────────────────────
            crate::routes::categories::CreateCategoryRequest,
            crate::routes::categories::UpdateParentRequest,
            crate::routes::categories::CategoryBody,
            crate::routes::categories::CategoryListResponse,
            crate::routes::categories::CategoryTreeNode,
            // ── Maintenance DTOs ────────────────────────────────────────
            crate::routes::maintenance::RecomputeRequest,
            crate::routes::maintenance::RecomputeResponse,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "compliance", description = "Per-vendor compliance reports at a reference date"),
        (name = "dashboard", description = "Register aggregation, vendor summary, and document review load"),
        (name = "vendors", description = "Vendor registration, competence claims, and document submission"),
        (name = "documents", description = "Document review lifecycle — under review, approved, rejected"),
        (name = "categories", description = "Merceological category forest with cycle-checked moves"),
        (name = "maintenance", description = "Back-office batch operations — document expiry sweep"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates_successfully() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Albo API — Vendor Qualification Register");
        assert_eq!(spec.info.version, "0.3.7");
    }

    #[test]
    fn spec_covers_every_surface() {
        let spec = ApiDoc::openapi();
        for expected in &[
            "/v1/compliance/{vendor_id}",
            "/v1/dashboard/stats",
            "/v1/dashboard/summary",
            "/v1/dashboard/documents",
            "/v1/vendors",
            "/v1/vendors/{id}",
            "/v1/vendors/{id}/competences",
            "/v1/vendors/{id}/documents",
            "/v1/documents/{id}/review",
            "/v1/categories",
            "/v1/categories/tree",
            "/v1/categories/{id}/parent",
            "/v1/categories/{id}",
            "/v1/maintenance/recompute-expired",
        ] {
            assert!(
                spec.paths.paths.contains_key(*expected),
                "should contain {expected} path"
            );
        }
    }

    #[test]
    fn spec_has_tags() {
        let spec = ApiDoc::openapi();
        let tags = spec.tags.as_ref().expect("spec should have tags");
        let tag_names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        for expected in &[
            "compliance",
            "dashboard",
            "vendors",
            "documents",
            "categories",
            "maintenance",
        ] {
            assert!(tag_names.contains(expected), "should contain {expected} tag");
        }
    }

    #[test]
    fn spec_has_schema_components() {
        let spec = ApiDoc::openapi();
        let components = spec.components.as_ref().expect("spec should have components");
        for name in &[
            "ErrorBody",
            "ComplianceReportBody",
            "RequirementRefBody",
            "VendorBody",
            "AssignmentBody",
            "DocumentBody",
            "CategoryTreeNode",
            "VendorSummaryBody",
            "RecomputeResponse",
        ] {
            assert!(
                components.schemas.contains_key(*name),
                "should contain {name} schema"
            );
        }
    }

    #[test]
    fn spec_has_security_scheme() {
        let spec = ApiDoc::openapi();
        let components = spec.components.as_ref().unwrap();
        assert!(
            components.security_schemes.contains_key("bearer_auth"),
            "should contain bearer_auth security scheme"
        );
    }

    #[test]
    fn spec_serializes_to_json() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).expect("spec should serialize");
        assert!(json.contains("openapi"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn router_builds() {
        let _r = router();
    }
}
