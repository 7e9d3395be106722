//! Application-level orchestration for the menu studio
//!
//! Sits between the HTTP handlers and the repository: runs reorder
//! validation before any mutation is attempted, enforces the soft-delete
//! children guard, and routes structural moves (parent changes) through the
//! same normalization path as explicit reorders so sibling groups stay
//! dense and the parent chain stays acyclic at all times.

use oms_common::MenuNode;
use sqlx::SqlitePool;

use crate::db::{MenuPatch, MenuRepository, NewMenu};
use crate::error::MenuError;
use crate::query::ListMenusQuery;
use crate::reorder::{validate_reorder, ReorderItem};
use crate::tree::{build_tree, TreeBuild};

#[derive(Clone)]
pub struct MenuService {
    repo: MenuRepository,
}

impl MenuService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { repo: MenuRepository::new(pool) }
    }

    /// Nested forest of active nodes, with orphan diagnostics
    pub async fn tree(&self) -> Result<TreeBuild, MenuError> {
        let nodes = self.repo.fetch_active().await?;
        Ok(build_tree(nodes))
    }

    /// Flat listing with typed filters
    pub async fn list(&self, query: &ListMenusQuery) -> Result<Vec<MenuNode>, MenuError> {
        self.repo.list(query).await
    }

    /// Create a node, appended to the end of its sibling group.
    ///
    /// When the client supplies a desired `order_index`, the freshly
    /// inserted row is immediately moved there through the reorder path so
    /// the group stays dense.
    pub async fn create(
        &self,
        new: NewMenu,
        requested_index: Option<i64>,
        actor: &str,
    ) -> Result<MenuNode, MenuError> {
        if let Some(parent) = new.parent_id {
            if self.repo.fetch(parent).await?.is_none() {
                return Err(MenuError::UnknownNode(parent));
            }
        }

        let created = self.repo.create(&new, actor).await?;

        if let Some(index) = requested_index {
            if index != created.order_index {
                let placement = ReorderItem {
                    id: created.id,
                    parent_id: created.parent_id,
                    order_index: index,
                };
                self.reorder(&[placement], actor).await?;
                if let Some(node) = self.repo.fetch(created.id).await? {
                    return Ok(node);
                }
            }
        }

        Ok(created)
    }

    /// Partial update; returns `None` when the id does not exist.
    ///
    /// A parent change is a structural move: it is validated up front
    /// (existence + cycle check), the field patch is applied, and only
    /// then is the move persisted. A failing patch therefore leaves the
    /// node's placement untouched. The moved node lands at the end of its
    /// new sibling group and the old group is compacted.
    pub async fn update(
        &self,
        id: i64,
        new_parent: Option<Option<i64>>,
        patch: MenuPatch,
        actor: &str,
    ) -> Result<Option<MenuNode>, MenuError> {
        let Some(existing) = self.repo.fetch(id).await? else {
            return Ok(None);
        };

        let placements = match new_parent {
            Some(parent) if parent != existing.parent_id => {
                let current = self.repo.fetch_all().await?;
                let placement = ReorderItem { id, parent_id: parent, order_index: i64::MAX };
                Some(validate_reorder(&current, &[placement])?)
            }
            _ => None,
        };

        let updated = if patch.is_empty() {
            Some(existing)
        } else {
            match self.repo.update(id, &patch, actor).await? {
                Some(node) => Some(node),
                None => return Ok(None),
            }
        };

        if let Some(placements) = placements {
            self.repo.reorder_batch(&placements, actor).await?;
            return self.repo.fetch(id).await;
        }
        Ok(updated)
    }

    /// Soft or hard delete.
    ///
    /// Soft delete is refused while the node has active children, so a
    /// hidden parent never leaves active children stranded in the tree.
    /// Hard delete skips the guard and leaves any children with a dangling
    /// parent_id (they surface in the tree's orphan diagnostics).
    pub async fn delete(&self, id: i64, hard: bool, actor: &str) -> Result<(), MenuError> {
        if self.repo.fetch(id).await?.is_none() {
            return Err(MenuError::NotFound);
        }

        if !hard && self.repo.active_child_count(id).await? > 0 {
            return Err(MenuError::HasActiveChildren(id));
        }

        self.repo.delete(id, hard, actor).await?;
        Ok(())
    }

    /// Validate and persist a reorder batch.
    ///
    /// All-or-nothing: validation failures propagate without touching
    /// storage, and the persistence step itself runs in one transaction.
    pub async fn reorder(&self, items: &[ReorderItem], actor: &str) -> Result<(), MenuError> {
        let current = self.repo.fetch_all().await?;
        let placements = validate_reorder(&current, items)?;
        self.repo.reorder_batch(&placements, actor).await?;
        Ok(())
    }
}
