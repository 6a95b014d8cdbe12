//! # Authentication & Authorization Middleware
//!
//! Bearer token middleware with role-based access control.
//!
//! ## Token Format
//!
//! Bearer tokens encode role and vendor identity:
//!
//! ```text
//! Bearer {role}:{vendor_id}:{secret}   — scoped format
//! Bearer {secret}                       — legacy format (treated as Admin)
//! ```
//!
//! ## CallerIdentity
//!
//! Every authenticated request gets a [`CallerIdentity`] injected into the
//! request extensions. Handlers extract it via the `FromRequestParts` impl
//! and check permissions against the static capability table.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody, ErrorDetail};

// ── Role ────────────────────────────────────────────────────────────────────

/// Roles in the vendor register, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Vendor < BackOffice < Admin`. This enables `>=` comparison when a
/// capability is resolved to its minimum role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A supplier-side caller. Can read its own compliance report only.
    Vendor,
    /// Qualification office staff. Manages vendors, reviews documents,
    /// reads dashboards, and runs maintenance.
    BackOffice,
    /// Full access, including category administration.
    Admin,
}

impl Role {
    /// Return the string representation of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::BackOffice => "back_office",
            Self::Admin => "admin",
        }
    }
}

// ── Capability table ────────────────────────────────────────────────────────

/// Permissions checked by route handlers.
///
/// The mapping to roles is static: a capability resolves to the minimum
/// role that holds it, and the caller's role is compared against that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read a compliance report. Vendor-role callers are additionally
    /// restricted to their own report via [`CallerIdentity::can_view_vendor`].
    ViewComplianceReport,
    /// List and read vendor records.
    BrowseVendors,
    /// Create vendors, upsert competence assignments, submit documents.
    ManageVendors,
    /// Apply review decisions to submitted documents.
    ReviewDocuments,
    /// Read dashboard aggregations and summaries.
    ViewDashboards,
    /// List categories and the category tree.
    BrowseCategories,
    /// Create, re-parent, and delete categories.
    AdministerCategories,
    /// Run the expired-status recompute.
    RunMaintenance,
}

impl Capability {
    /// The minimum role holding this capability.
    pub fn minimum_role(self) -> Role {
        match self {
            Self::ViewComplianceReport => Role::Vendor,
            Self::BrowseVendors
            | Self::ManageVendors
            | Self::ReviewDocuments
            | Self::ViewDashboards
            | Self::BrowseCategories
            | Self::RunMaintenance => Role::BackOffice,
            Self::AdministerCategories => Role::Admin,
        }
    }

    /// Return the string representation of this capability.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewComplianceReport => "view_compliance_report",
            Self::BrowseVendors => "browse_vendors",
            Self::ManageVendors => "manage_vendors",
            Self::ReviewDocuments => "review_documents",
            Self::ViewDashboards => "view_dashboards",
            Self::BrowseCategories => "browse_categories",
            Self::AdministerCategories => "administer_categories",
            Self::RunMaintenance => "run_maintenance",
        }
    }
}

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, extracted from the auth context
/// and available to all route handlers via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// The caller's role in the system.
    pub role: Role,
    /// The caller's vendor binding (for the vendor role).
    /// None for admin and back office, they operate across vendors.
    pub vendor_id: Option<Uuid>,
}

impl CallerIdentity {
    /// Check if the caller holds the given capability.
    pub fn allows(&self, capability: Capability) -> bool {
        self.role >= capability.minimum_role()
    }

    /// Check if the caller can read data scoped to the given vendor.
    ///
    /// Admin and back office can read any vendor. A vendor-role caller
    /// can only read the vendor its token is bound to.
    pub fn can_view_vendor(&self, vendor_id: Uuid) -> bool {
        match self.role {
            Role::Admin | Role::BackOffice => true,
            Role::Vendor => self.vendor_id == Some(vendor_id),
        }
    }
}

/// Axum `FromRequestParts` implementation for `CallerIdentity`.
///
/// Extracts the identity that the auth middleware injected into extensions.
/// Returns 401 if no identity is present (middleware didn't run or failed).
#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check the capability table for the caller.
/// Returns 403 Forbidden if the caller's role does not hold the capability.
pub fn require_capability(
    caller: &CallerIdentity,
    capability: Capability,
) -> Result<(), AppError> {
    if caller.allows(capability) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "capability '{}' requires role '{}', caller has '{}'",
            capability.as_str(),
            capability.minimum_role().as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Auth Configuration ──────────────────────────────────────────────────────

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ── Token Validation ────────────────────────────────────────────────────────

/// Constant-time comparison of bearer tokens.
///
/// Prevents timing side-channels that could reveal token length or prefix.
/// When lengths differ, performs a dummy comparison to avoid leaking length
/// information through timing variance.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse the bearer token in format `{role}:{vendor_id}:{secret}` or `{secret}` (legacy).
///
/// Legacy tokens (without role prefix) are treated as `Admin` for backward
/// compatibility with existing deployments.
pub fn parse_bearer_token(provided: &str, expected_secret: &str) -> Result<CallerIdentity, String> {
    let parts: Vec<&str> = provided.splitn(3, ':').collect();

    match parts.len() {
        // Legacy format: just the secret.
        1 => {
            if constant_time_token_eq(provided, expected_secret) {
                Ok(CallerIdentity {
                    role: Role::Admin,
                    vendor_id: None,
                })
            } else {
                Err("invalid bearer token".into())
            }
        }
        // Scoped format: role:vendor_id:secret (vendor_id may be empty).
        3 => {
            let role_str = parts[0];
            let vendor_str = parts[1];
            let secret = parts[2];

            if !constant_time_token_eq(secret, expected_secret) {
                return Err("invalid bearer token".into());
            }

            let role = match role_str {
                "admin" => Role::Admin,
                "back_office" => Role::BackOffice,
                "vendor" => Role::Vendor,
                other => return Err(format!("unknown role: {other}")),
            };

            let vendor_id = if vendor_str.is_empty() {
                None
            } else {
                Some(
                    vendor_str
                        .parse::<Uuid>()
                        .map_err(|e| format!("invalid vendor_id: {e}"))?,
                )
            };

            Ok(CallerIdentity { role, vendor_id })
        }
        _ => Err("invalid token format — expected {role}:{vendor_id}:{secret} or {secret}".into()),
    }
}

// ── Middleware ───────────────────────────────────────────────────────────────

/// Extract and validate the Bearer token from the Authorization header.
///
/// Parses the token into a `CallerIdentity` (role + vendor binding) and
/// injects it into request extensions for downstream handlers.
///
/// When `AuthConfig.token` is `None`, all requests are allowed with `Admin`
/// identity (auth disabled / development mode).
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected_token = request.extensions().get::<AuthConfig>().cloned();

    match expected_token {
        Some(AuthConfig {
            token: Some(ref expected),
        }) => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            match auth_header {
                Some(header_value) if header_value.starts_with("Bearer ") => {
                    let provided = &header_value[7..];
                    match parse_bearer_token(provided, expected) {
                        Ok(identity) => {
                            request.extensions_mut().insert(identity);
                            next.run(request).await
                        }
                        Err(msg) => {
                            tracing::warn!(reason = %msg, "authentication failed: invalid bearer token");
                            unauthorized_response(&msg)
                        }
                    }
                }
                Some(_) => {
                    tracing::warn!("authentication failed: non-Bearer authorization scheme");
                    unauthorized_response("authorization header must use Bearer scheme")
                }
                None => {
                    tracing::warn!("authentication failed: missing authorization header");
                    unauthorized_response("missing authorization header")
                }
            }
        }
        _ => {
            // Auth disabled — inject Admin identity for full access.
            request.extensions_mut().insert(CallerIdentity {
                role: Role::Admin,
                vendor_id: None,
            });
            next.run(request).await
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            details: None,
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// Build a minimal router with the auth middleware and a simple handler.
    fn test_app(token: Option<String>) -> Router {
        let auth_config = AuthConfig { token };
        Router::new()
            .route("/test", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(auth_config))
    }

    fn caller(role: Role, vendor_id: Option<Uuid>) -> CallerIdentity {
        CallerIdentity { role, vendor_id }
    }

    // ── Middleware tests ──────────────────────────────────────────

    #[tokio::test]
    async fn valid_bearer_token_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn missing_authorization_header_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing"));
    }

    #[tokio::test]
    async fn invalid_token_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"]["code"], "UNAUTHORIZED");
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("invalid"));
    }

    #[tokio::test]
    async fn non_bearer_scheme_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Bearer scheme"));
    }

    #[tokio::test]
    async fn auth_disabled_allows_all_requests() {
        let app = test_app(None);

        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn auth_disabled_ignores_provided_token() {
        let app = test_app(None);

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer anything")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_scoped_format_vendor_accepted() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header(
                "Authorization",
                "Bearer vendor:550e8400-e29b-41d4-a716-446655440000:my-secret",
            )
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn middleware_unknown_role_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer superadmin::my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn middleware_invalid_uuid_rejected() {
        let app = test_app(Some("my-secret".to_string()));

        let request = Request::builder()
            .uri("/test")
            .header("Authorization", "Bearer vendor:not-a-uuid:my-secret")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ── Constant-time comparison tests ───────────────────────────

    #[test]
    fn constant_time_eq_identical_tokens() {
        assert!(constant_time_token_eq(
            "secret-token-123",
            "secret-token-123"
        ));
    }

    #[test]
    fn constant_time_eq_rejects_wrong_token() {
        assert!(!constant_time_token_eq("wrong-token", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(!constant_time_token_eq("secret", "secret-token-123"));
    }

    #[test]
    fn constant_time_eq_rejects_empty() {
        assert!(!constant_time_token_eq("", "secret-token-123"));
    }

    // ── Role tests ───────────────────────────────────────────────

    #[test]
    fn role_ordering_is_correct() {
        assert!(Role::Vendor < Role::BackOffice);
        assert!(Role::BackOffice < Role::Admin);
    }

    #[test]
    fn role_as_str() {
        assert_eq!(Role::Vendor.as_str(), "vendor");
        assert_eq!(Role::BackOffice.as_str(), "back_office");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    // ── Capability table tests ───────────────────────────────────

    #[test]
    fn admin_holds_every_capability() {
        let admin = caller(Role::Admin, None);
        for capability in [
            Capability::ViewComplianceReport,
            Capability::BrowseVendors,
            Capability::ManageVendors,
            Capability::ReviewDocuments,
            Capability::ViewDashboards,
            Capability::BrowseCategories,
            Capability::AdministerCategories,
            Capability::RunMaintenance,
        ] {
            assert!(admin.allows(capability), "{capability:?}");
        }
    }

    #[test]
    fn back_office_cannot_administer_categories() {
        let staff = caller(Role::BackOffice, None);
        assert!(staff.allows(Capability::ManageVendors));
        assert!(staff.allows(Capability::ReviewDocuments));
        assert!(staff.allows(Capability::RunMaintenance));
        assert!(!staff.allows(Capability::AdministerCategories));
    }

    #[test]
    fn vendor_only_views_compliance() {
        let vendor = caller(Role::Vendor, Some(Uuid::new_v4()));
        assert!(vendor.allows(Capability::ViewComplianceReport));
        assert!(!vendor.allows(Capability::BrowseVendors));
        assert!(!vendor.allows(Capability::ViewDashboards));
        assert!(!vendor.allows(Capability::RunMaintenance));
    }

    #[test]
    fn require_capability_names_the_gap() {
        let vendor = caller(Role::Vendor, None);
        let err = require_capability(&vendor, Capability::ReviewDocuments).unwrap_err();
        match err {
            AppError::Forbidden(msg) => {
                assert!(msg.contains("review_documents"));
                assert!(msg.contains("back_office"));
                assert!(msg.contains("vendor"));
            }
            other => panic!("expected Forbidden, got: {other:?}"),
        }

        assert!(require_capability(&caller(Role::Admin, None), Capability::ReviewDocuments).is_ok());
    }

    // ── Vendor scoping tests ─────────────────────────────────────

    #[test]
    fn back_office_views_any_vendor() {
        let staff = caller(Role::BackOffice, None);
        assert!(staff.can_view_vendor(Uuid::new_v4()));
    }

    #[test]
    fn vendor_views_own_record_only() {
        let own = Uuid::new_v4();
        let vendor = caller(Role::Vendor, Some(own));
        assert!(vendor.can_view_vendor(own));
        assert!(!vendor.can_view_vendor(Uuid::new_v4()));
    }

    #[test]
    fn vendor_without_binding_is_denied() {
        let vendor = caller(Role::Vendor, None);
        assert!(!vendor.can_view_vendor(Uuid::new_v4()));
    }

    // ── parse_bearer_token tests ─────────────────────────────────

    #[test]
    fn parse_bearer_token_legacy_format() {
        let identity = parse_bearer_token("my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.vendor_id.is_none());
    }

    #[test]
    fn parse_bearer_token_scoped_admin() {
        let identity = parse_bearer_token("admin::my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert!(identity.vendor_id.is_none());
    }

    #[test]
    fn parse_bearer_token_scoped_back_office() {
        let identity = parse_bearer_token("back_office::my-secret", "my-secret").unwrap();
        assert_eq!(identity.role, Role::BackOffice);
        assert!(identity.vendor_id.is_none());
    }

    #[test]
    fn parse_bearer_token_scoped_vendor() {
        let identity = parse_bearer_token(
            "vendor:550e8400-e29b-41d4-a716-446655440000:my-secret",
            "my-secret",
        )
        .unwrap();
        assert_eq!(identity.role, Role::Vendor);
        assert_eq!(
            identity.vendor_id.unwrap().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn parse_bearer_token_wrong_secret() {
        let result = parse_bearer_token("admin::wrong", "my-secret");
        assert!(result.is_err());
    }

    #[test]
    fn parse_bearer_token_unknown_role() {
        let result = parse_bearer_token("superadmin::my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("unknown role"));
    }

    #[test]
    fn parse_bearer_token_invalid_uuid() {
        let result = parse_bearer_token("vendor:not-a-uuid:my-secret", "my-secret");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("invalid vendor_id"));
    }

    #[test]
    fn parse_bearer_token_two_parts_rejected() {
        let result = parse_bearer_token("role:secret", "secret");
        assert!(result.is_err());
    }
}
