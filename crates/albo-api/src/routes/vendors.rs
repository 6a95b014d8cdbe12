//! # Vendor Administration API
//!
//! Vendor records and the two per-vendor submission endpoints:
//!
//! - `GET /v1/vendors` — list, ordered by vendor code.
//! - `GET /v1/vendors/{id}` — one record.
//! - `POST /v1/vendors` — register a vendor; the code is generated
//!   server-side and immutable.
//! - `POST /v1/vendors/{id}/competences` — claim a competence (upsert by
//!   the `(vendor, competence)` key).
//! - `POST /v1/vendors/{id}/documents` — submit a document for review.
//!
//! Responses carry `is_qualified`, derived from the qualification status
//! and expiry at the reference date; it is never stored.
//!
//! ## Authorization
//!
//! Requires back office or admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use albo_core::{CategoryId, CompetenceId, DocumentStatus, DocumentTypeId, QualificationStatus, RiskLevel, VendorId, VendorType};
use albo_registry::{CompetenceAssignment, Vendor, VendorDocument};

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::routes::resolve_as_of;
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────────────

/// Create vendor request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateVendorRequest {
    /// Legal company name.
    pub company_name: String,
    /// Legal form (`company`, `sole_proprietor`, `freelancer`, `consortium`).
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub vendor_type: Option<VendorType>,
    /// Category the vendor belongs to. Must exist.
    #[serde(default)]
    pub category: Option<Uuid>,
    /// Free-text service type.
    #[serde(default)]
    pub service_type: Option<String>,
    /// Free-text region.
    #[serde(default)]
    pub region: Option<String>,
}

impl Validate for CreateVendorRequest {
    fn validate(&self) -> Result<(), String> {
        if self.company_name.trim().is_empty() {
            return Err("company_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Claim-a-competence request. Upserts by the `(vendor, competence)` key.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpsertAssignmentRequest {
    /// Catalog entry being claimed.
    pub competence_id: Uuid,
    /// Whether the vendor claims the competence. Defaults to true.
    #[serde(default = "default_true")]
    pub has_competence: bool,
    /// Whether a certification document backs the claim.
    #[serde(default)]
    pub has_certification: bool,
    /// Date the competence (or its certification) was issued.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Date the competence lapses.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Whether the back office verified the claim.
    #[serde(default)]
    pub verified: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for UpsertAssignmentRequest {
    fn validate(&self) -> Result<(), String> {
        // Date ordering is the register's invariant and is checked there.
        Ok(())
    }
}

/// Submit-a-document request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitDocumentRequest {
    /// Catalog entry the submission instantiates.
    pub document_type_id: Uuid,
    /// Date the document was issued.
    #[serde(default)]
    pub issue_date: Option<NaiveDate>,
    /// Date the document expires. Absent with an issue date present, the
    /// catalog's default validity fills it in.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    /// Submitter notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl Validate for SubmitDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Query parameters for vendor reads.
#[derive(Debug, Deserialize)]
pub struct VendorQueryParams {
    /// Reference date for the derived qualification flag. Defaults to today.
    pub as_of: Option<String>,
}

// ── Response DTOs ───────────────────────────────────────────────────────────

/// Vendor record response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VendorBody {
    /// Unique identifier.
    pub id: Uuid,
    /// Immutable, server-generated code.
    pub vendor_code: String,
    /// Legal company name.
    pub company_name: String,
    /// Legal form.
    #[schema(value_type = Option<String>)]
    pub vendor_type: Option<VendorType>,
    /// Category the vendor belongs to.
    pub category: Option<Uuid>,
    /// Free-text service type.
    pub service_type: Option<String>,
    /// Free-text region.
    pub region: Option<String>,
    /// Stored qualification decision.
    #[schema(value_type = String)]
    pub qualification_status: QualificationStatus,
    /// Assessed risk level.
    #[schema(value_type = String)]
    pub risk_level: RiskLevel,
    /// Qualification score, 0 to 100.
    pub qualification_score: Option<f64>,
    /// Date the qualification was granted.
    pub qualification_date: Option<NaiveDate>,
    /// Date the qualification lapses.
    pub qualification_expiry: Option<NaiveDate>,
    /// Date of the last audit.
    pub last_audit_date: Option<NaiveDate>,
    /// Date the next audit is due.
    pub next_audit_due: Option<NaiveDate>,
    /// On-time delivery rate, 0 to 100.
    pub on_time_delivery_rate: Option<f64>,
    /// Average quality rating, 0 to 5.
    pub quality_rating_avg: Option<f64>,
    /// Average response time in hours.
    pub average_response_time_hours: Option<f64>,
    /// Order fulfillment rate, 0 to 100.
    pub fulfillment_rate: Option<f64>,
    /// Whether the record is active.
    pub active: bool,
    /// Derived: approved with an unexpired qualification at the
    /// reference date.
    pub is_qualified: bool,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Last mutation time.
    pub updated_at: DateTime<Utc>,
}

impl VendorBody {
    fn from_vendor(vendor: &Vendor, as_of: NaiveDate) -> Self {
        Self {
            id: *vendor.id.as_uuid(),
            vendor_code: vendor.vendor_code.as_str().to_string(),
            company_name: vendor.company_name.clone(),
            vendor_type: vendor.vendor_type,
            category: vendor.category.map(|c| *c.as_uuid()),
            service_type: vendor.service_type.clone(),
            region: vendor.region.clone(),
            qualification_status: vendor.qualification_status,
            risk_level: vendor.risk_level,
            qualification_score: vendor.qualification_score,
            qualification_date: vendor.qualification_date,
            qualification_expiry: vendor.qualification_expiry,
            last_audit_date: vendor.last_audit_date,
            next_audit_due: vendor.next_audit_due,
            on_time_delivery_rate: vendor.on_time_delivery_rate,
            quality_rating_avg: vendor.quality_rating_avg,
            average_response_time_hours: vendor.average_response_time_hours,
            fulfillment_rate: vendor.fulfillment_rate,
            active: vendor.active,
            is_qualified: vendor.is_qualified(as_of),
            created_at: vendor.created_at,
            updated_at: vendor.updated_at,
        }
    }
}

/// Vendor list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorListResponse {
    /// Number of records.
    pub count: usize,
    /// Vendor records, ordered by vendor code.
    pub vendors: Vec<VendorBody>,
}

/// Competence assignment response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentBody {
    /// Unique identifier.
    pub id: Uuid,
    /// Vendor holding the competence.
    pub vendor_id: Uuid,
    /// Competence being held.
    pub competence_id: Uuid,
    /// Whether the vendor currently claims the competence.
    pub has_competence: bool,
    /// Whether a certification document backs the claim.
    pub has_certification: bool,
    /// Date the competence was issued.
    pub issue_date: Option<NaiveDate>,
    /// Date the competence lapses.
    pub expiry_date: Option<NaiveDate>,
    /// Whether the back office verified the claim.
    pub verified: bool,
}

impl From<CompetenceAssignment> for AssignmentBody {
    fn from(assignment: CompetenceAssignment) -> Self {
        Self {
            id: *assignment.id.as_uuid(),
            vendor_id: *assignment.vendor_id.as_uuid(),
            competence_id: *assignment.competence_id.as_uuid(),
            has_competence: assignment.has_competence,
            has_certification: assignment.has_certification,
            issue_date: assignment.issue_date,
            expiry_date: assignment.expiry_date,
            verified: assignment.verified,
        }
    }
}

/// Vendor document response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentBody {
    /// Unique identifier.
    pub id: Uuid,
    /// Vendor the document belongs to.
    pub vendor_id: Uuid,
    /// Document type this record instantiates.
    pub document_type_id: Uuid,
    /// Date the document was issued.
    pub issue_date: Option<NaiveDate>,
    /// Date the document expires.
    pub expiry_date: Option<NaiveDate>,
    /// Review lifecycle status.
    #[schema(value_type = String)]
    pub status: DocumentStatus,
    /// Whether the back office verified the document contents.
    pub verified: bool,
    /// Reviewer notes.
    pub notes: Option<String>,
}

impl From<VendorDocument> for DocumentBody {
    fn from(document: VendorDocument) -> Self {
        Self {
            id: *document.id.as_uuid(),
            vendor_id: *document.vendor_id.as_uuid(),
            document_type_id: *document.document_type_id.as_uuid(),
            issue_date: document.issue_date,
            expiry_date: document.expiry_date,
            status: document.status,
            verified: document.verified,
            notes: document.notes,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────────────────

/// Build the vendors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/vendors", get(list_vendors).post(create_vendor))
        .route("/v1/vendors/:id", get(get_vendor))
        .route("/v1/vendors/:id/competences", post(upsert_assignment))
        .route("/v1/vendors/:id/documents", post(submit_document))
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /v1/vendors — List vendors, ordered by vendor code.
#[utoipa::path(
    get,
    path = "/v1/vendors",
    params(
        ("as_of" = Option<String>, Query, description = "Reference date for the qualification flag"),
    ),
    responses(
        (status = 200, description = "Vendor list", body = VendorListResponse),
    ),
    tag = "vendors"
)]
async fn list_vendors(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<VendorQueryParams>,
) -> Result<Json<VendorListResponse>, AppError> {
    require_capability(&caller, Capability::BrowseVendors)?;
    let as_of = resolve_as_of(params.as_of.as_deref())?;

    let registry = state.registry.read();
    let mut vendors: Vec<VendorBody> = registry
        .vendors()
        .map(|v| VendorBody::from_vendor(v, as_of))
        .collect();
    vendors.sort_by(|a, b| a.vendor_code.cmp(&b.vendor_code));

    Ok(Json(VendorListResponse {
        count: vendors.len(),
        vendors,
    }))
}

/// GET /v1/vendors/{id} — One vendor record.
#[utoipa::path(
    get,
    path = "/v1/vendors/{id}",
    params(
        ("id" = Uuid, Path, description = "Vendor identifier"),
        ("as_of" = Option<String>, Query, description = "Reference date for the qualification flag"),
    ),
    responses(
        (status = 200, description = "Vendor record", body = VendorBody),
        (status = 404, description = "Vendor not found", body = crate::error::ErrorBody),
    ),
    tag = "vendors"
)]
async fn get_vendor(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Query(params): Query<VendorQueryParams>,
) -> Result<Json<VendorBody>, AppError> {
    require_capability(&caller, Capability::BrowseVendors)?;
    let as_of = resolve_as_of(params.as_of.as_deref())?;

    let registry = state.registry.read();
    let vendor = registry.get_vendor(VendorId::from_uuid(id))?;

    Ok(Json(VendorBody::from_vendor(vendor, as_of)))
}

/// POST /v1/vendors — Register a vendor.
///
/// The vendor code is generated server-side; a code in the payload is
/// ignored. A referenced category must exist.
#[utoipa::path(
    post,
    path = "/v1/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = VendorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "vendors"
)]
async fn create_vendor(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateVendorRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VendorBody>), AppError> {
    require_capability(&caller, Capability::ManageVendors)?;
    let req = extract_validated_json(body)?;

    let mut vendor = Vendor::new(req.company_name);
    if let Some(vendor_type) = req.vendor_type {
        vendor = vendor.with_vendor_type(vendor_type);
    }
    if let Some(category) = req.category {
        vendor = vendor.with_category(CategoryId::from_uuid(category));
    }
    if let Some(service_type) = req.service_type {
        vendor = vendor.with_service_type(service_type);
    }
    if let Some(region) = req.region {
        vendor = vendor.with_region(region);
    }

    let record = {
        let mut registry = state.registry.write();
        let id = registry.add_vendor(vendor)?;
        registry.get_vendor(id)?.clone()
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::vendors::insert(pool, &record).await {
            tracing::error!(error = %e, vendor_id = %record.id, "failed to persist vendor");
            return Err(AppError::Internal(
                "vendor recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    let as_of = Utc::now().date_naive();
    Ok((
        StatusCode::CREATED,
        Json(VendorBody::from_vendor(&record, as_of)),
    ))
}

/// POST /v1/vendors/{id}/competences — Claim a competence.
///
/// Upserts by the `(vendor, competence)` key: a repeated claim updates
/// the stored record in place and keeps its identifier.
#[utoipa::path(
    post,
    path = "/v1/vendors/{id}/competences",
    params(
        ("id" = Uuid, Path, description = "Vendor identifier"),
    ),
    request_body = UpsertAssignmentRequest,
    responses(
        (status = 200, description = "Assignment recorded", body = AssignmentBody),
        (status = 404, description = "Vendor or competence not found", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "vendors"
)]
async fn upsert_assignment(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpsertAssignmentRequest>, JsonRejection>,
) -> Result<Json<AssignmentBody>, AppError> {
    require_capability(&caller, Capability::ManageVendors)?;
    let req = extract_validated_json(body)?;

    let vendor_id = VendorId::from_uuid(id);
    let mut assignment =
        CompetenceAssignment::new(vendor_id, CompetenceId::from_uuid(req.competence_id));
    assignment.has_competence = req.has_competence;
    assignment.has_certification = req.has_certification;
    assignment.issue_date = req.issue_date;
    assignment.expiry_date = req.expiry_date;
    assignment.verified = req.verified;

    let record = {
        let mut registry = state.registry.write();
        let assignment_id = registry.upsert_assignment(assignment)?;
        let record = registry
            .assignments()
            .find(|a| a.id == assignment_id)
            .cloned()
            .ok_or_else(|| {
                AppError::Internal("assignment not readable after upsert".to_string())
            })?;
        record
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::assignments::upsert(pool, &record).await {
            tracing::error!(error = %e, assignment_id = %record.id, "failed to persist assignment");
            return Err(AppError::Internal(
                "assignment recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(record.into()))
}

/// POST /v1/vendors/{id}/documents — Submit a document for review.
///
/// A first submission creates the record; re-submitting after a
/// rejection replaces it under a fresh identifier. A submission against
/// an approved or in-review record is refused.
#[utoipa::path(
    post,
    path = "/v1/vendors/{id}/documents",
    params(
        ("id" = Uuid, Path, description = "Vendor identifier"),
    ),
    request_body = SubmitDocumentRequest,
    responses(
        (status = 201, description = "Document submitted", body = DocumentBody),
        (status = 404, description = "Vendor or document type not found", body = crate::error::ErrorBody),
        (status = 409, description = "Submission refused by the review lifecycle", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failed", body = crate::error::ErrorBody),
    ),
    tag = "vendors"
)]
async fn submit_document(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<SubmitDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DocumentBody>), AppError> {
    require_capability(&caller, Capability::ManageVendors)?;
    let req = extract_validated_json(body)?;

    let record = {
        let mut registry = state.registry.write();
        let document_id = registry.submit_document(
            VendorId::from_uuid(id),
            DocumentTypeId::from_uuid(req.document_type_id),
            req.issue_date,
            req.expiry_date,
            req.notes,
        )?;
        registry.get_document(document_id)?.clone()
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::documents::upsert(pool, &record).await {
            tracing::error!(error = %e, document_id = %record.id, "failed to persist document");
            return Err(AppError::Internal(
                "document recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(record.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use albo_registry::Registry;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn back_office() -> CallerIdentity {
        CallerIdentity {
            role: Role::BackOffice,
            vendor_id: None,
        }
    }

    fn test_app(state: AppState) -> Router {
        router()
            .layer(axum::Extension(back_office()))
            .with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_vendor_generates_a_code() {
        let app = test_app(AppState::new());
        let req = post_json(
            "/v1/vendors",
            serde_json::json!({"company_name": "Prova SRL", "region": "Lazio"}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let vendor: VendorBody = body_json(resp).await;
        assert_eq!(vendor.company_name, "Prova SRL");
        assert_eq!(vendor.vendor_code.len(), 10);
        assert_eq!(vendor.region.as_deref(), Some("Lazio"));
        assert!(!vendor.is_qualified);
    }

    #[tokio::test]
    async fn create_vendor_rejects_blank_name() {
        let app = test_app(AppState::new());
        let req = post_json("/v1/vendors", serde_json::json!({"company_name": "   "}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn create_vendor_rejects_unknown_category() {
        let app = test_app(AppState::new());
        let req = post_json(
            "/v1/vendors",
            serde_json::json!({"company_name": "Prova SRL", "category": Uuid::new_v4()}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn list_is_ordered_by_vendor_code() {
        let mut registry = Registry::with_standard_catalogs();
        registry.add_vendor(Vendor::new("Zeta SRL")).unwrap();
        registry.add_vendor(Vendor::new("Alfa SNC")).unwrap();
        registry.add_vendor(Vendor::new("Mezzo SpA")).unwrap();
        let app = test_app(AppState::with_registry(registry));

        let req = Request::builder()
            .uri("/v1/vendors")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let list: VendorListResponse = body_json(resp).await;
        assert_eq!(list.count, 3);
        let codes: Vec<&str> = list.vendors.iter().map(|v| v.vendor_code.as_str()).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[tokio::test]
    async fn get_vendor_not_found_is_404() {
        let app = test_app(AppState::new());
        let req = Request::builder()
            .uri(format!("/v1/vendors/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn claim_then_reclaim_keeps_the_assignment_id() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let competence_id = *registry
            .competences()
            .iter()
            .next()
            .unwrap()
            .id
            .as_uuid();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/competences", vendor_id.as_uuid());
        let req = post_json(&uri, serde_json::json!({"competence_id": competence_id}));
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let first: AssignmentBody = body_json(resp).await;

        let req = post_json(
            &uri,
            serde_json::json!({"competence_id": competence_id, "has_certification": true}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let second: AssignmentBody = body_json(resp).await;

        assert_eq!(first.id, second.id);
        assert!(second.has_certification);
    }

    #[tokio::test]
    async fn claim_rejects_inverted_dates() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let competence_id = *registry
            .competences()
            .iter()
            .next()
            .unwrap()
            .id
            .as_uuid();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/competences", vendor_id.as_uuid());
        let req = post_json(
            &uri,
            serde_json::json!({
                "competence_id": competence_id,
                "issue_date": "2025-06-01",
                "expiry_date": "2025-01-01"
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn claim_unknown_competence_is_404() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/competences", vendor_id.as_uuid());
        let req = post_json(&uri, serde_json::json!({"competence_id": Uuid::new_v4()}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn submit_document_fills_expiry_from_catalog() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let durc = registry.document_types().get_by_code("DURC").unwrap();
        let validity = durc.default_validity_days.unwrap();
        let document_type_id = *durc.id.as_uuid();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/documents", vendor_id.as_uuid());
        let req = post_json(
            &uri,
            serde_json::json!({
                "document_type_id": document_type_id,
                "issue_date": "2025-01-10"
            }),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let document: DocumentBody = body_json(resp).await;
        assert_eq!(document.status, DocumentStatus::Submitted);
        let issue = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert_eq!(
            document.expiry_date,
            Some(issue + chrono::Days::new(u64::from(validity)))
        );
    }

    #[tokio::test]
    async fn resubmit_after_rejection_mints_a_fresh_id() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let document_type_id = registry.document_types().get_by_code("DURC").unwrap().id;
        let first_id = registry
            .submit_document(vendor_id, document_type_id, None, None, None)
            .unwrap();
        registry
            .review_document(first_id, DocumentStatus::Rejected, Some("illeggibile".into()))
            .unwrap();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/documents", vendor_id.as_uuid());
        let req = post_json(
            &uri,
            serde_json::json!({"document_type_id": document_type_id.as_uuid()}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let document: DocumentBody = body_json(resp).await;
        assert_ne!(document.id, *first_id.as_uuid());
        assert_eq!(document.status, DocumentStatus::Submitted);
    }

    #[tokio::test]
    async fn submit_over_approved_document_is_409() {
        let mut registry = Registry::with_standard_catalogs();
        let vendor_id = registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let document_type_id = registry.document_types().get_by_code("DURC").unwrap().id;
        let document_id = registry
            .submit_document(vendor_id, document_type_id, None, None, None)
            .unwrap();
        registry
            .review_document(document_id, DocumentStatus::Approved, None)
            .unwrap();
        let app = test_app(AppState::with_registry(registry));

        let uri = format!("/v1/vendors/{}/documents", vendor_id.as_uuid());
        let req = post_json(
            &uri,
            serde_json::json!({"document_type_id": document_type_id.as_uuid()}),
        );
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn vendor_role_cannot_create() {
        let identity = CallerIdentity {
            role: Role::Vendor,
            vendor_id: Some(Uuid::new_v4()),
        };
        let app = router()
            .layer(axum::Extension(identity))
            .with_state(AppState::new());

        let req = post_json("/v1/vendors", serde_json::json!({"company_name": "Prova"}));
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn router_builds() {
        let _r = router();
    }
}
