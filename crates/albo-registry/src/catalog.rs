//! # Requirement Catalogs
//!
//! Definitions of what vendors can be required to hold: competences
//! (roles, training, qualifications) and document types (DURC, visure,
//! insurance, certifications). Each definition carries an
//! [`Applicability`] describing which vendor categories it binds to;
//! resolution against the hierarchy happens in `albo-engine`.
//!
//! Both catalogs share the generic [`Catalog`] container, which keeps a
//! code index alongside the id map so lookups by business code stay O(1).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use albo_core::{
    CategoryId, CompetenceDomain, CompetenceId, DocumentDomain, DocumentTypeId, HierarchyError,
    ValidationError,
};

use crate::hierarchy::CategoryArena;

const fn default_true() -> bool {
    true
}

// -- Applicability ------------------------------------------------------------

/// How far a category-bound definition reaches along the hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    /// Only the listed categories.
    #[default]
    CategoryOnly,
    /// The listed categories and their ancestors.
    IncludeAncestors,
    /// The listed categories and their descendants.
    IncludeDescendants,
}

/// Which vendors a catalog definition applies to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    /// Applies to every vendor, categorized or not.
    #[default]
    Global,
    /// Applies to vendors in the listed categories, widened by `scope`.
    Categories {
        /// Categories the definition is attached to.
        ids: Vec<CategoryId>,
        /// Hierarchy reach of the attachment.
        #[serde(default)]
        scope: CategoryScope,
    },
}

impl Applicability {
    /// Shorthand for a single-category attachment with default scope.
    pub fn category(id: CategoryId) -> Self {
        Self::Categories {
            ids: vec![id],
            scope: CategoryScope::CategoryOnly,
        }
    }

    /// Whether the definition applies to a vendor in `category`.
    ///
    /// Uncategorized vendors only match [`Applicability::Global`]
    /// definitions. Hierarchy walks propagate their errors so a corrupt
    /// snapshot surfaces instead of silently shrinking requirement sets.
    pub fn applies_to(
        &self,
        category: Option<CategoryId>,
        arena: &CategoryArena,
    ) -> Result<bool, HierarchyError> {
        match self {
            Applicability::Global => Ok(true),
            Applicability::Categories { ids, scope } => {
                let Some(category) = category else {
                    return Ok(false);
                };
                if ids.contains(&category) {
                    return Ok(true);
                }
                match scope {
                    CategoryScope::CategoryOnly => Ok(false),
                    CategoryScope::IncludeDescendants => {
                        // attached at an ancestor, reaches down to the vendor
                        let ancestors = arena.ancestors(category)?;
                        Ok(ids.iter().any(|id| ancestors.contains(id)))
                    }
                    CategoryScope::IncludeAncestors => {
                        for id in ids {
                            if arena.ancestors(*id)?.contains(&category) {
                                return Ok(true);
                            }
                        }
                        Ok(false)
                    }
                }
            }
        }
    }

    /// Category ids referenced by this applicability, for write guards.
    pub fn referenced_categories(&self) -> &[CategoryId] {
        match self {
            Applicability::Global => &[],
            Applicability::Categories { ids, .. } => ids,
        }
    }
}

// -- Definitions --------------------------------------------------------------

/// A competence vendors can be required to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetenceDef {
    /// Unique identifier.
    pub id: CompetenceId,
    /// Short unique code, e.g. `RSPP` or `PATENT_GRU`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Free-form description, e.g. the underlying norm.
    #[serde(default)]
    pub description: Option<String>,
    /// Domain the competence belongs to.
    pub domain: CompetenceDomain,
    /// Whether holding it requires a certification record.
    #[serde(default)]
    pub requires_certification: bool,
    /// Whether the competence lapses and must be renewed.
    #[serde(default)]
    pub requires_renewal: bool,
    /// Renewal period, when one is fixed.
    #[serde(default)]
    pub renewal_period_months: Option<u32>,
    /// Whether every applicable vendor must hold it.
    #[serde(default)]
    pub mandatory: bool,
    /// Inactive definitions are excluded from resolution.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Which vendors the definition binds to.
    #[serde(default)]
    pub applies_to: Applicability,
}

impl CompetenceDef {
    /// Create an active, optional, globally applicable competence.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        domain: CompetenceDomain,
    ) -> Self {
        Self {
            id: CompetenceId::new(),
            code: code.into(),
            name: name.into(),
            description: None,
            domain,
            requires_certification: false,
            requires_renewal: false,
            renewal_period_months: None,
            mandatory: false,
            active: true,
            applies_to: Applicability::Global,
        }
    }

    /// Mark the competence as mandatory for applicable vendors.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Require a certification record as evidence.
    pub fn with_certification(mut self) -> Self {
        self.requires_certification = true;
        self
    }

    /// Make the competence renewable on a fixed period.
    pub fn with_renewal(mut self, months: u32) -> Self {
        self.requires_renewal = true;
        self.renewal_period_months = Some(months);
        self
    }

    /// Restrict the competence to an applicability.
    pub fn applies(mut self, applies_to: Applicability) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Check structural validity of the definition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "code" });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.renewal_period_months == Some(0) {
            return Err(ValidationError::OutOfRange {
                field: "renewal_period_months",
                value: 0.0,
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        Ok(())
    }
}

/// A document type vendors can be required to keep on file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTypeDef {
    /// Unique identifier.
    pub id: DocumentTypeId,
    /// Short unique code, e.g. `DURC` or `ISO_9001`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Domain the document belongs to.
    pub domain: DocumentDomain,
    /// Whether every applicable vendor must keep one on file.
    #[serde(default)]
    pub mandatory: bool,
    /// Whether the document lapses and must be re-submitted.
    #[serde(default)]
    pub requires_renewal: bool,
    /// Validity applied when a submission carries no expiry date.
    #[serde(default)]
    pub default_validity_days: Option<u32>,
    /// How many days before expiry the document counts as expiring.
    #[serde(default = "DocumentTypeDef::default_alert_days")]
    pub alert_days_before_expiry: i64,
    /// Inactive definitions are excluded from resolution.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Which vendors the definition binds to.
    #[serde(default)]
    pub applies_to: Applicability,
}

impl DocumentTypeDef {
    /// Fallback alert window in days.
    pub const DEFAULT_ALERT_DAYS: i64 = 30;

    const fn default_alert_days() -> i64 {
        Self::DEFAULT_ALERT_DAYS
    }

    /// Create an active, optional, non-renewing, globally applicable
    /// document type with the default alert window.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        domain: DocumentDomain,
    ) -> Self {
        Self {
            id: DocumentTypeId::new(),
            code: code.into(),
            name: name.into(),
            domain,
            mandatory: false,
            requires_renewal: false,
            default_validity_days: None,
            alert_days_before_expiry: Self::DEFAULT_ALERT_DAYS,
            active: true,
            applies_to: Applicability::Global,
        }
    }

    /// Mark the document type as mandatory for applicable vendors.
    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    /// Make the document renewable: submissions default to
    /// `validity_days` of validity and alert `alert_days` before expiry.
    pub fn with_validity(mut self, validity_days: u32, alert_days: i64) -> Self {
        self.requires_renewal = true;
        self.default_validity_days = Some(validity_days);
        self.alert_days_before_expiry = alert_days;
        self
    }

    /// Override the alert window without touching renewal settings.
    pub fn with_alert(mut self, alert_days: i64) -> Self {
        self.alert_days_before_expiry = alert_days;
        self
    }

    /// Restrict the document type to an applicability.
    pub fn applies(mut self, applies_to: Applicability) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Check structural validity of the definition.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "code" });
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        if self.default_validity_days == Some(0) {
            return Err(ValidationError::OutOfRange {
                field: "default_validity_days",
                value: 0.0,
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        if self.alert_days_before_expiry < 0 {
            return Err(ValidationError::OutOfRange {
                field: "alert_days_before_expiry",
                value: self.alert_days_before_expiry as f64,
                min: 0.0,
                max: f64::from(u32::MAX),
            });
        }
        Ok(())
    }
}

// -- Catalog container --------------------------------------------------------

/// Behaviour the generic [`Catalog`] needs from a definition.
pub trait CatalogEntry: Clone {
    /// Identifier type of the definition.
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug + std::fmt::Display;

    /// The definition's unique id.
    fn entry_id(&self) -> Self::Id;
    /// The definition's unique code.
    fn entry_code(&self) -> &str;
    /// Whether the definition takes part in resolution.
    fn is_active(&self) -> bool;
}

impl CatalogEntry for CompetenceDef {
    type Id = CompetenceId;

    fn entry_id(&self) -> CompetenceId {
        self.id
    }

    fn entry_code(&self) -> &str {
        &self.code
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl CatalogEntry for DocumentTypeDef {
    type Id = DocumentTypeId;

    fn entry_id(&self) -> DocumentTypeId {
        self.id
    }

    fn entry_code(&self) -> &str {
        &self.code
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Id-addressed definition store with a unique-code index.
#[derive(Debug, Clone)]
pub struct Catalog<T: CatalogEntry> {
    entries: HashMap<T::Id, T>,
    by_code: HashMap<String, T::Id>,
}

/// Catalog of competence definitions.
pub type CompetenceCatalog = Catalog<CompetenceDef>;
/// Catalog of document type definitions.
pub type DocumentTypeCatalog = Catalog<DocumentTypeDef>;

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            by_code: HashMap::new(),
        }
    }
}

impl<T: CatalogEntry> Catalog<T> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a definition with this id exists.
    pub fn contains(&self, id: T::Id) -> bool {
        self.entries.contains_key(&id)
    }

    /// Insert or replace a definition. The code must be unique across
    /// the catalog; replacing a definition re-indexes its code.
    pub fn insert(&mut self, entry: T) -> Result<T::Id, ValidationError> {
        let id = entry.entry_id();
        let code = entry.entry_code().to_string();
        if let Some(&holder) = self.by_code.get(&code) {
            if holder != id {
                return Err(ValidationError::DuplicateCode { code });
            }
        }
        if let Some(previous) = self.entries.insert(id, entry) {
            self.by_code.remove(previous.entry_code());
        }
        self.by_code.insert(code, id);
        Ok(id)
    }

    /// Remove a definition, returning it.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let removed = self.entries.remove(&id)?;
        self.by_code.remove(removed.entry_code());
        Some(removed)
    }

    /// Look up a definition by id.
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.entries.get(&id)
    }

    /// Look up a definition by code.
    pub fn get_by_code(&self, code: &str) -> Option<&T> {
        self.by_code.get(code).and_then(|id| self.entries.get(id))
    }

    /// Iterate over all definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterate over active definitions in unspecified order.
    pub fn active(&self) -> impl Iterator<Item = &T> {
        self.entries.values().filter(|e| e.is_active())
    }

    /// All definitions ordered by code.
    pub fn sorted_by_code(&self) -> Vec<&T> {
        let mut all: Vec<&T> = self.entries.values().collect();
        all.sort_by(|a, b| a.entry_code().cmp(b.entry_code()));
        all
    }
}
