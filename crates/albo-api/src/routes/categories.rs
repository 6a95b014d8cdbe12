//! # Category Hierarchy API
//!
//! The merceological category forest:
//!
//! - `GET /v1/categories` — flat list, ordered by `(sort_order, code)`.
//! - `GET /v1/categories/tree` — the forest, roots first, each node
//!   carrying its children.
//! - `POST /v1/categories` — create a category.
//! - `PATCH /v1/categories/{id}/parent` — move a category. An edge that
//!   would close a cycle is refused and the hierarchy stays as it was.
//! - `DELETE /v1/categories/{id}` — delete a category. Blocked while
//!   subcategories, vendors, or catalog entries still reference it.
//!
//! ## Authorization
//!
//! Reads require back office; mutations require admin.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use albo_core::{CategoryId, RiskLevel};
use albo_registry::{Category, CategoryArena};

use crate::auth::{require_capability, CallerIdentity, Capability};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────────────

/// Create category request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    /// Short unique code, e.g. `EDIL` or `IMP-ELET`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Parent category. Absent creates a root.
    #[serde(default)]
    pub parent: Option<Uuid>,
    /// Whether vendors in this category must hold certifications.
    #[serde(default)]
    pub requires_certification: bool,
    /// Risk level applied to vendors carrying none of their own.
    /// Defaults to `MEDIUM`.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub default_risk_level: Option<RiskLevel>,
    /// Position among siblings in listings.
    #[serde(default)]
    pub sort_order: Option<i32>,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Result<(), String> {
        if self.code.trim().is_empty() {
            return Err("code must not be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Re-parent request. A null or absent parent moves the category to
/// the root level.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParentRequest {
    /// The new parent.
    #[serde(default)]
    pub parent: Option<Uuid>,
}

impl Validate for UpdateParentRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ── Response DTOs ───────────────────────────────────────────────────────────

/// Category record response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryBody {
    /// Unique identifier.
    pub id: Uuid,
    /// Short unique code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Parent category, absent for roots.
    pub parent: Option<Uuid>,
    /// Whether vendors in this category must hold certifications.
    pub requires_certification: bool,
    /// Risk level applied to vendors carrying none of their own.
    #[schema(value_type = String)]
    pub default_risk_level: RiskLevel,
    /// Position among siblings in listings.
    pub sort_order: i32,
    /// Whether the category participates in requirement resolution.
    pub active: bool,
}

impl From<&Category> for CategoryBody {
    fn from(category: &Category) -> Self {
        Self {
            id: *category.id.as_uuid(),
            code: category.code.clone(),
            name: category.name.clone(),
            parent: category.parent.map(|p| *p.as_uuid()),
            requires_certification: category.requires_certification,
            default_risk_level: category.default_risk_level,
            sort_order: category.sort_order,
            active: category.active,
        }
    }
}

/// Category list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryListResponse {
    /// Number of records.
    pub count: usize,
    /// Category records, ordered by `(sort_order, code)`.
    pub categories: Vec<CategoryBody>,
}

/// One node of the category forest.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryTreeNode {
    /// Unique identifier.
    pub id: Uuid,
    /// Short unique code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether vendors in this category must hold certifications.
    pub requires_certification: bool,
    /// Risk level applied to vendors carrying none of their own.
    #[schema(value_type = String)]
    pub default_risk_level: RiskLevel,
    /// Position among siblings in listings.
    pub sort_order: i32,
    /// Whether the category participates in requirement resolution.
    pub active: bool,
    /// Subcategories, ordered by `(sort_order, code)`.
    pub children: Vec<CategoryTreeNode>,
}

/// Build the subtree rooted at each of `ids`, ordered by
/// `(sort_order, code)`.
fn tree_nodes(arena: &CategoryArena, ids: &[CategoryId]) -> Vec<CategoryTreeNode> {
    let mut categories: Vec<&Category> = ids.iter().filter_map(|id| arena.get(*id)).collect();
    categories.sort_by(|a, b| (a.sort_order, &a.code).cmp(&(b.sort_order, &b.code)));
    categories
        .into_iter()
        .map(|category| CategoryTreeNode {
            id: *category.id.as_uuid(),
            code: category.code.clone(),
            name: category.name.clone(),
            requires_certification: category.requires_certification,
            default_risk_level: category.default_risk_level,
            sort_order: category.sort_order,
            active: category.active,
            children: tree_nodes(arena, &arena.children(category.id)),
        })
        .collect()
}

// ── Router ──────────────────────────────────────────────────────────────────

/// Build the categories router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/categories", get(list_categories).post(create_category))
        .route("/v1/categories/tree", get(category_tree))
        .route("/v1/categories/:id/parent", patch(update_parent))
        .route("/v1/categories/:id", delete(delete_category))
}

// ── Handlers ────────────────────────────────────────────────────────────────

/// GET /v1/categories — Flat list, ordered by `(sort_order, code)`.
#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "Category list", body = CategoryListResponse),
    ),
    tag = "categories"
)]
async fn list_categories(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<CategoryListResponse>, AppError> {
    require_capability(&caller, Capability::BrowseCategories)?;

    let registry = state.registry.read();
    let mut categories: Vec<CategoryBody> = registry.arena().iter().map(Into::into).collect();
    categories.sort_by(|a, b| (a.sort_order, &a.code).cmp(&(b.sort_order, &b.code)));

    Ok(Json(CategoryListResponse {
        count: categories.len(),
        categories,
    }))
}

/// GET /v1/categories/tree — The category forest, roots first.
#[utoipa::path(
    get,
    path = "/v1/categories/tree",
    responses(
        (status = 200, description = "Category forest", body = [CategoryTreeNode]),
    ),
    tag = "categories"
)]
async fn category_tree(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<CategoryTreeNode>>, AppError> {
    require_capability(&caller, Capability::BrowseCategories)?;

    let registry = state.registry.read();
    let arena = registry.arena();
    Ok(Json(tree_nodes(arena, &arena.roots())))
}

/// POST /v1/categories — Create a category.
#[utoipa::path(
    post,
    path = "/v1/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryBody),
        (status = 422, description = "Validation failed or unknown parent", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn create_category(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CategoryBody>), AppError> {
    require_capability(&caller, Capability::AdministerCategories)?;
    let req = extract_validated_json(body)?;

    let mut category = Category::new(req.code, req.name);
    if let Some(parent) = req.parent {
        category = category.with_parent(CategoryId::from_uuid(parent));
    }
    category.requires_certification = req.requires_certification;
    if let Some(level) = req.default_risk_level {
        category.default_risk_level = level;
    }
    if let Some(sort_order) = req.sort_order {
        category.sort_order = sort_order;
    }

    let record = {
        let mut registry = state.registry.write();
        let id = registry.add_category(category)?;
        registry.get_category(id)?.clone()
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::categories::insert(pool, &record).await {
            tracing::error!(error = %e, category_id = %record.id, "failed to persist category");
            return Err(AppError::Internal(
                "category recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok((StatusCode::CREATED, Json(CategoryBody::from(&record))))
}

/// PATCH /v1/categories/{id}/parent — Move a category.
///
/// An edge that would close a cycle, including self-parenting, is
/// refused with a conflict and the hierarchy stays as it was.
#[utoipa::path(
    patch,
    path = "/v1/categories/{id}/parent",
    params(
        ("id" = Uuid, Path, description = "Category identifier"),
    ),
    request_body = UpdateParentRequest,
    responses(
        (status = 200, description = "Category moved", body = CategoryBody),
        (status = 404, description = "Category not found", body = crate::error::ErrorBody),
        (status = 409, description = "Edge would close a cycle", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown parent", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn update_parent(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateParentRequest>, JsonRejection>,
) -> Result<Json<CategoryBody>, AppError> {
    require_capability(&caller, Capability::AdministerCategories)?;
    let req = extract_validated_json(body)?;

    let category_id = CategoryId::from_uuid(id);
    let parent = req.parent.map(CategoryId::from_uuid);

    let record = {
        let mut registry = state.registry.write();
        // missing target is a 404, not an invalid-edge 422
        registry.get_category(category_id)?;
        registry.set_category_parent(category_id, parent)?;
        registry.get_category(category_id)?.clone()
    };

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::categories::update_parent(pool, category_id, parent).await {
            tracing::error!(error = %e, category_id = %record.id, "failed to persist category parent");
            return Err(AppError::Internal(
                "move recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(Json(CategoryBody::from(&record)))
}

/// DELETE /v1/categories/{id} — Delete a category.
#[utoipa::path(
    delete,
    path = "/v1/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category identifier"),
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorBody),
        (status = 409, description = "Category still referenced", body = crate::error::ErrorBody),
    ),
    tag = "categories"
)]
async fn delete_category(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_capability(&caller, Capability::AdministerCategories)?;

    let category_id = CategoryId::from_uuid(id);
    {
        let mut registry = state.registry.write();
        registry.delete_category(category_id)?;
    }

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::categories::delete(pool, category_id).await {
            tracing::error!(error = %e, category_id = %id, "failed to persist category deletion");
            return Err(AppError::Internal(
                "deletion recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    Ok(StatusCode::NO_CONTENT)
}
