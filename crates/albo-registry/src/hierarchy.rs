//! # Category Hierarchy
//!
//! Id-addressed arena for merceological categories. Categories form a
//! forest: each node holds an optional parent id, and every edge is
//! validated at write time so the stored hierarchy is always acyclic and
//! within the depth bound. Read-side walks still carry guards (depth
//! bound on ancestor walks, visited set on descendant walks) so a corrupt
//! snapshot loaded from outside degrades into an error instead of an
//! infinite loop.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use albo_core::{CategoryId, HierarchyError, RiskLevel};

/// Upper bound on hierarchy depth. Real category trees are three or four
/// levels deep; anything past this indicates corrupt data.
pub const MAX_CATEGORY_DEPTH: usize = 32;

const fn default_true() -> bool {
    true
}

/// A merceological category vendors are classified under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,
    /// Short unique code, e.g. `EDIL` or `IMP-ELET`.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Parent category, `None` for roots.
    #[serde(default)]
    pub parent: Option<CategoryId>,
    /// Whether vendors in this category must hold certifications.
    #[serde(default)]
    pub requires_certification: bool,
    /// Risk level applied to vendors that carry none of their own.
    pub default_risk_level: RiskLevel,
    /// Position among siblings in listings.
    #[serde(default)]
    pub sort_order: i32,
    /// Inactive categories are kept for history but excluded from
    /// requirement resolution.
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Category {
    /// Create a root category with a fresh id and default attributes.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            code: code.into(),
            name: name.into(),
            parent: None,
            requires_certification: false,
            default_risk_level: RiskLevel::Medium,
            sort_order: 0,
            active: true,
        }
    }

    /// Set the parent on a freshly built category.
    pub fn with_parent(mut self, parent: CategoryId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// The category forest, addressed by [`CategoryId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryArena {
    categories: HashMap<CategoryId, Category>,
}

impl CategoryArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories in the arena.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the arena holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether a category with this id exists.
    pub fn contains(&self, id: CategoryId) -> bool {
        self.categories.contains_key(&id)
    }

    /// Look up a category by id.
    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Look up a category for mutation. Callers must not change `parent`
    /// through this; re-parenting goes through [`CategoryArena::set_parent`]
    /// so the cycle guard runs.
    pub fn get_mut(&mut self, id: CategoryId) -> Option<&mut Category> {
        self.categories.get_mut(&id)
    }

    /// Iterate over all categories in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    /// Insert a category, validating that its parent (if any) exists and
    /// that the resulting chain stays within [`MAX_CATEGORY_DEPTH`].
    /// Re-inserting an existing id replaces the stored node.
    pub fn insert(&mut self, category: Category) -> Result<CategoryId, HierarchyError> {
        if let Some(parent_id) = category.parent {
            if parent_id == category.id {
                return Err(HierarchyError::CycleDetected {
                    category: category.id,
                    requested_parent: parent_id,
                });
            }
            let chain = self.ancestors(parent_id)?;
            if chain.len() + 2 > MAX_CATEGORY_DEPTH {
                return Err(HierarchyError::DepthExceeded {
                    start: category.id,
                    max_depth: MAX_CATEGORY_DEPTH,
                });
            }
        }
        let id = category.id;
        self.categories.insert(id, category);
        Ok(id)
    }

    /// Remove a category, returning it. Reference guards (children,
    /// assigned vendors, catalog entries) are the register's job; the
    /// arena only removes the node.
    pub fn remove(&mut self, id: CategoryId) -> Option<Category> {
        self.categories.remove(&id)
    }

    /// Re-parent a category. The requested edge is validated before
    /// anything is written: if the walk from `parent` up to the roots
    /// passes through `id`, the edge would close a cycle and the
    /// hierarchy is left exactly as it was.
    pub fn set_parent(
        &mut self,
        id: CategoryId,
        parent: Option<CategoryId>,
    ) -> Result<(), HierarchyError> {
        if !self.contains(id) {
            return Err(HierarchyError::UnknownCategory(id));
        }
        if let Some(parent_id) = parent {
            if !self.contains(parent_id) {
                return Err(HierarchyError::UnknownCategory(parent_id));
            }
            let mut current = Some(parent_id);
            let mut hops = 0usize;
            while let Some(node_id) = current {
                if node_id == id {
                    return Err(HierarchyError::CycleDetected {
                        category: id,
                        requested_parent: parent_id,
                    });
                }
                if hops >= MAX_CATEGORY_DEPTH {
                    return Err(HierarchyError::DepthExceeded {
                        start: parent_id,
                        max_depth: MAX_CATEGORY_DEPTH,
                    });
                }
                current = self.categories.get(&node_id).and_then(|c| c.parent);
                hops += 1;
            }
        }
        if let Some(node) = self.categories.get_mut(&id) {
            node.parent = parent;
        }
        Ok(())
    }

    /// Ancestor chain of `start`, nearest first, excluding `start`
    /// itself. Bounded by [`MAX_CATEGORY_DEPTH`].
    pub fn ancestors(&self, start: CategoryId) -> Result<Vec<CategoryId>, HierarchyError> {
        let mut out = Vec::new();
        let mut current = self
            .categories
            .get(&start)
            .ok_or(HierarchyError::UnknownCategory(start))?
            .parent;
        while let Some(id) = current {
            if out.len() >= MAX_CATEGORY_DEPTH {
                return Err(HierarchyError::DepthExceeded {
                    start,
                    max_depth: MAX_CATEGORY_DEPTH,
                });
            }
            let node = self
                .categories
                .get(&id)
                .ok_or(HierarchyError::UnknownCategory(id))?;
            out.push(id);
            current = node.parent;
        }
        Ok(out)
    }

    /// All descendants of `start`, breadth-first, excluding `start`
    /// itself. Carries a visited set so corrupt input cannot loop.
    pub fn descendants(&self, start: CategoryId) -> Result<Vec<CategoryId>, HierarchyError> {
        if !self.contains(start) {
            return Err(HierarchyError::UnknownCategory(start));
        }
        let mut seen: HashSet<CategoryId> = HashSet::from([start]);
        let mut queue: VecDeque<CategoryId> = self.children(start).into();
        let mut out = Vec::new();
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            queue.extend(self.children(next));
        }
        Ok(out)
    }

    /// Direct children of `id`, ordered by `sort_order` then code.
    pub fn children(&self, id: CategoryId) -> Vec<CategoryId> {
        let mut kids: Vec<&Category> = self
            .categories
            .values()
            .filter(|c| c.parent == Some(id))
            .collect();
        kids.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.code.cmp(&b.code))
        });
        kids.into_iter().map(|c| c.id).collect()
    }

    /// Root categories, ordered by `sort_order` then code.
    pub fn roots(&self) -> Vec<CategoryId> {
        let mut roots: Vec<&Category> = self
            .categories
            .values()
            .filter(|c| c.parent.is_none())
            .collect();
        roots.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.code.cmp(&b.code))
        });
        roots.into_iter().map(|c| c.id).collect()
    }

    /// Whether any category names `id` as its parent.
    pub fn has_children(&self, id: CategoryId) -> bool {
        self.categories.values().any(|c| c.parent == Some(id))
    }
}
