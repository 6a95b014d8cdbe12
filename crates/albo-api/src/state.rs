//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! The vendor register lives in a single [`Registry`] guarded by a
//! `parking_lot::RwLock`. All registry operations are synchronous and the
//! lock is never held across an `.await` point; database writes happen
//! after the guard is dropped. `parking_lot::RwLock` is non-poisonable,
//! so a panicking writer does not permanently corrupt the register.

use std::sync::Arc;

use albo_registry::Registry;
use parking_lot::RwLock;
use sqlx::PgPool;

/// Application configuration.
///
/// Custom `Debug` redacts the `auth_token` to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Static bearer token for authentication.
    /// If `None`, authentication is disabled.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// Shared application state accessible to all route handlers.
///
/// Clone-friendly: the registry sits behind an `Arc` and `PgPool` is
/// internally reference-counted.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The vendor register: category hierarchy, requirement catalogs,
    /// vendors, competence assignments, and documents.
    pub registry: Arc<RwLock<Registry>>,

    /// PostgreSQL connection pool for durable persistence.
    /// When `Some`, every mutation is written through to Postgres in
    /// addition to the in-memory register. When `None`, the API operates
    /// in in-memory-only mode.
    pub db_pool: Option<PgPool>,

    /// Application configuration.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new application state with default configuration, the
    /// standard requirement catalogs, and no database pool.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Create a new application state with the given configuration and
    /// optional database pool.
    ///
    /// Without a pool the register is seeded with the standard catalogs so
    /// an in-memory instance is usable out of the box. With a pool the
    /// register starts empty: [`AppState::hydrate_from_db`] seeds the
    /// catalogs into the database and loads everything back, so the
    /// database keeps ownership of catalog entry identities across restarts.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let registry = if db_pool.is_some() {
            Registry::new()
        } else {
            Registry::with_standard_catalogs()
        };
        Self {
            registry: Arc::new(RwLock::new(registry)),
            db_pool,
            config,
        }
    }

    /// Create an application state around an existing register.
    ///
    /// Used by tests to start from a known fixture.
    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            db_pool: None,
            config: AppConfig::default(),
        }
    }

    /// Hydrate the in-memory register from the database.
    ///
    /// Called once on startup when a database pool is available. First seeds
    /// the standard catalogs into the database (`ON CONFLICT (code) DO
    /// NOTHING`, so the ids minted on first boot survive every later
    /// restart), then loads categories, catalogs, vendors, assignments, and
    /// documents back into the register. Rows that fail validation are
    /// skipped with a warning; a bad row never takes the server down.
    pub async fn hydrate_from_db(&self) -> Result<(), String> {
        let pool = match &self.db_pool {
            Some(pool) => pool,
            None => return Ok(()),
        };

        // Seed the standard catalogs.
        let seed = Registry::with_standard_catalogs();
        for def in seed.competences().iter() {
            crate::db::competences::insert_if_absent(pool, def)
                .await
                .map_err(|e| format!("failed to seed competence catalog: {e}"))?;
        }
        for def in seed.document_types().iter() {
            crate::db::document_types::insert_if_absent(pool, def)
                .await
                .map_err(|e| format!("failed to seed document type catalog: {e}"))?;
        }

        // Load everything referenced-first: categories before catalogs and
        // vendors, vendors before assignments and documents.
        let categories = crate::db::categories::load_all(pool)
            .await
            .map_err(|e| format!("failed to load categories: {e}"))?;
        let competences = crate::db::competences::load_all(pool)
            .await
            .map_err(|e| format!("failed to load competences: {e}"))?;
        let document_types = crate::db::document_types::load_all(pool)
            .await
            .map_err(|e| format!("failed to load document types: {e}"))?;
        let vendors = crate::db::vendors::load_all(pool)
            .await
            .map_err(|e| format!("failed to load vendors: {e}"))?;
        let assignments = crate::db::assignments::load_all(pool)
            .await
            .map_err(|e| format!("failed to load competence assignments: {e}"))?;
        let documents = crate::db::documents::load_all(pool)
            .await
            .map_err(|e| format!("failed to load vendor documents: {e}"))?;

        let mut registry = self.registry.write();

        // Categories land in two passes so parent edges never depend on row
        // order: insert every node unparented, then wire the edges.
        let mut parent_edges = Vec::new();
        let mut category_count = 0usize;
        for mut category in categories {
            if let Some(parent) = category.parent.take() {
                parent_edges.push((category.id, parent));
            }
            match registry.add_category(category) {
                Ok(_) => category_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored category"),
            }
        }
        for (id, parent) in parent_edges {
            if let Err(e) = registry.set_category_parent(id, Some(parent)) {
                tracing::warn!(category = %id, error = %e, "skipping stored category parent edge");
            }
        }

        let mut competence_count = 0usize;
        for def in competences {
            match registry.add_competence_def(def) {
                Ok(_) => competence_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored competence definition"),
            }
        }

        let mut document_type_count = 0usize;
        for def in document_types {
            match registry.add_document_type_def(def) {
                Ok(_) => document_type_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored document type definition"),
            }
        }

        let mut vendor_count = 0usize;
        for vendor in vendors {
            match registry.add_vendor(vendor) {
                Ok(_) => vendor_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored vendor"),
            }
        }

        let mut assignment_count = 0usize;
        for assignment in assignments {
            match registry.insert_assignment(assignment) {
                Ok(_) => assignment_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored competence assignment"),
            }
        }

        let mut document_count = 0usize;
        for document in documents {
            match registry.insert_document(document) {
                Ok(_) => document_count += 1,
                Err(e) => tracing::warn!(error = %e, "skipping stored vendor document"),
            }
        }

        tracing::info!(
            categories = category_count,
            competences = competence_count,
            document_types = document_type_count,
            vendors = vendor_count,
            assignments = assignment_count,
            documents = document_count,
            "Hydrated vendor register from database"
        );

        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use albo_registry::Vendor;

    #[test]
    fn app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn app_config_debug_redacts_token() {
        let config = AppConfig {
            port: 9090,
            auth_token: Some("super-secret".to_string()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("9090"));
    }

    #[test]
    fn app_config_debug_shows_none_when_disabled() {
        let config = AppConfig::default();
        let debug = format!("{config:?}");
        assert!(debug.contains("None"));
    }

    #[test]
    fn new_state_carries_standard_catalogs() {
        let state = AppState::new();
        let registry = state.registry.read();
        assert!(!registry.competences().is_empty());
        assert!(!registry.document_types().is_empty());
        assert!(state.db_pool.is_none());
    }

    #[test]
    fn with_registry_preserves_contents() {
        let mut registry = Registry::with_standard_catalogs();
        registry.add_vendor(Vendor::new("Prova SRL")).unwrap();
        let state = AppState::with_registry(registry);
        assert_eq!(state.registry.read().vendor_count(), 1);
    }

    #[test]
    fn clones_share_the_register() {
        let state = AppState::new();
        let clone = state.clone();
        state
            .registry
            .write()
            .add_vendor(Vendor::new("Condivisa SpA"))
            .unwrap();
        assert_eq!(clone.registry.read().vendor_count(), 1);
    }

    #[tokio::test]
    async fn hydrate_without_pool_is_a_no_op() {
        let state = AppState::new();
        state.hydrate_from_db().await.unwrap();
        assert_eq!(state.registry.read().vendor_count(), 0);
    }
}
