//! # albo-api — Axum API Services for the Vendor Register
//!
//! The HTTP layer above the vendor qualification engine. It exposes the
//! register (vendors, categories, catalogs), the submission and review
//! lifecycle, per-vendor compliance reports, and the dashboard
//! aggregations, with optional Postgres persistence behind the in-memory
//! register.
//!
//! ## API Surface
//!
//! | Prefix                          | Module                   | Domain             |
//! |---------------------------------|--------------------------|--------------------|
//! | `/v1/compliance/*`              | [`routes::compliance`]   | Compliance reports |
//! | `/v1/dashboard/*`               | [`routes::dashboard`]    | Aggregations       |
//! | `/v1/vendors/*`                 | [`routes::vendors`]      | Vendor admin       |
//! | `/v1/documents/*`               | [`routes::documents`]    | Document review    |
//! | `/v1/categories/*`              | [`routes::categories`]   | Category forest    |
//! | `/v1/maintenance/*`             | [`routes::maintenance`]  | Batch operations   |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Auto-generated spec via utoipa derive macros at `/openapi.json`.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::collections::HashMap;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `ALBO_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything other than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("ALBO_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Authenticated API routes.
    //
    // Body size limit: 2 MiB. This prevents OOM from oversized request
    // bodies; no current route carries payloads anywhere near it.
    let api = Router::new()
        .merge(routes::compliance::router())
        .merge(routes::dashboard::router())
        .merge(routes::vendors::router())
        .merge(routes::documents::router())
        .merge(routes::categories::router())
        .merge(routes::maintenance::router())
        .merge(openapi::router());

    let mut api = api
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(from_fn(auth::auth_middleware));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(axum::Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated health probes — readiness checks actual service health.
    let mut unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    // Mount /metrics when metrics are enabled (unauthenticated, like health probes).
    if metrics_on {
        unauthenticated = unauthenticated
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(axum::Extension(metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates domain gauges from the current register on each scrape (pull
/// model), then gathers and encodes all metrics in Prometheus text
/// exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    // -- Update domain gauges from the register --
    //
    // Counts are collected under a scoped read lock; the lock is released
    // before encoding.
    let (vendors_by_status, documents_by_status, categories, competences, document_types) = {
        let registry = state.registry.read();

        let mut vendors_by_status: HashMap<String, usize> = HashMap::new();
        for vendor in registry.vendors() {
            *vendors_by_status
                .entry(vendor.qualification_status.as_str().to_string())
                .or_default() += 1;
        }

        let mut documents_by_status: HashMap<String, usize> = HashMap::new();
        for document in registry.documents() {
            *documents_by_status
                .entry(document.status.as_str().to_string())
                .or_default() += 1;
        }

        (
            vendors_by_status,
            documents_by_status,
            registry.arena().len(),
            registry.competences().len(),
            registry.document_types().len(),
        )
    };

    // Reset labelled gauges, then set current values.
    metrics.vendors_total().reset();
    for (status, count) in &vendors_by_status {
        metrics
            .vendors_total()
            .with_label_values(&[status])
            .set(*count as f64);
    }
    metrics.documents_total().reset();
    for (status, count) in &documents_by_status {
        metrics
            .documents_total()
            .with_label_values(&[status])
            .set(*count as f64);
    }
    metrics.categories_total().set(categories as f64);
    metrics.competence_defs_total().set(competences as f64);
    metrics.document_type_defs_total().set(document_types as f64);

    // -- Gather and encode --
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks:
/// - The register lock is acquirable (not poisoned by a stuck writer).
/// - Database connection is healthy (when configured).
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // parking_lot::RwLock::try_read is non-blocking.
    if state.registry.try_read().is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "register locked").into_response();
    }

    // Verify database connection (when configured).
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
