//! Menu row persistence
//!
//! Durable storage and retrieval of menu rows; no business validation
//! happens here. Reorder batches are applied inside a single transaction so
//! a concurrent reader never observes a sparse or duplicated sibling
//! ordering mid-update.

use chrono::Utc;
use oms_common::models::{parse_meta, parse_roles};
use oms_common::MenuNode;
use sqlx::SqlitePool;

use crate::error::MenuError;
use crate::query::ListMenusQuery;
use crate::reorder::NormalizedPlacement;

/// Fields for a new menu row. `order_index` is not part of this struct:
/// creation always appends to the end of the target sibling group.
#[derive(Debug, Clone)]
pub struct NewMenu {
    pub parent_id: Option<i64>,
    pub key_name: String,
    pub label: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub meta: Option<serde_json::Value>,
}

/// Partial update for a menu row. Outer `None` means "leave unchanged";
/// inner `None` on nullable columns means "set to NULL". Structural fields
/// (`parent_id`, `order_index`) are owned by the reorder path, not here.
#[derive(Debug, Clone, Default)]
pub struct MenuPatch {
    pub key_name: Option<String>,
    pub label: Option<String>,
    pub icon: Option<Option<String>>,
    pub path: Option<Option<String>>,
    pub roles: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub meta: Option<Option<serde_json::Value>>,
}

impl MenuPatch {
    pub fn is_empty(&self) -> bool {
        self.key_name.is_none()
            && self.label.is_none()
            && self.icon.is_none()
            && self.path.is_none()
            && self.roles.is_none()
            && self.is_active.is_none()
            && self.meta.is_none()
    }
}

/// Raw row as stored; JSON columns are TEXT and decoded defensively on the
/// way out, matching how the rest of the admin stack treats them
#[derive(Debug, sqlx::FromRow)]
struct MenuRow {
    id: i64,
    parent_id: Option<i64>,
    key_name: String,
    label: String,
    icon: Option<String>,
    path: Option<String>,
    roles: String,
    is_active: i64,
    order_index: i64,
    meta: Option<String>,
    created_at: String,
    updated_at: String,
    updated_by: Option<String>,
}

impl From<MenuRow> for MenuNode {
    fn from(row: MenuRow) -> Self {
        MenuNode {
            id: row.id,
            parent_id: row.parent_id,
            key_name: row.key_name,
            label: row.label,
            icon: row.icon,
            path: row.path,
            roles: parse_roles(&row.roles),
            is_active: row.is_active != 0,
            order_index: row.order_index,
            meta: parse_meta(row.meta.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        }
    }
}

#[derive(Clone)]
pub struct MenuRepository {
    pool: SqlitePool,
}

impl MenuRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch one row by id
    pub async fn fetch(&self, id: i64) -> Result<Option<MenuNode>, MenuError> {
        let row = sqlx::query_as::<_, MenuRow>("SELECT * FROM menus WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(MenuNode::from))
    }

    /// Full node set (active and inactive), ordered by sibling group.
    /// This is the input to reorder validation.
    pub async fn fetch_all(&self) -> Result<Vec<MenuNode>, MenuError> {
        let rows = sqlx::query_as::<_, MenuRow>(
            "SELECT * FROM menus ORDER BY parent_id ASC, order_index ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MenuNode::from).collect())
    }

    /// Active nodes only, ordered by sibling group. Input to tree assembly.
    pub async fn fetch_active(&self) -> Result<Vec<MenuNode>, MenuError> {
        let rows = sqlx::query_as::<_, MenuRow>(
            "SELECT * FROM menus WHERE is_active = 1 ORDER BY parent_id ASC, order_index ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MenuNode::from).collect())
    }

    /// Flat listing with typed filters, sorting, and optional paging
    pub async fn list(&self, query: &ListMenusQuery) -> Result<Vec<MenuNode>, MenuError> {
        let mut sql = String::from("SELECT * FROM menus WHERE 1=1");
        if query.q.is_some() {
            sql.push_str(" AND (label LIKE ? OR key_name LIKE ?)");
        }
        if query.active.is_some() {
            sql.push_str(" AND is_active = ?");
        }
        // Sort column and direction come from whitelisted enums, never from
        // raw client input
        sql.push_str(&format!(
            " ORDER BY {} {}",
            query.sort.as_sql(),
            query.dir.as_sql()
        ));
        if query.limit.is_some() {
            sql.push_str(" LIMIT ? OFFSET ?");
        }

        let like = query.q.as_ref().map(|q| format!("%{}%", q));
        let mut stmt = sqlx::query_as::<_, MenuRow>(&sql);
        if let Some(like) = &like {
            stmt = stmt.bind(like).bind(like);
        }
        if let Some(active) = query.active {
            stmt = stmt.bind(active as i64);
        }
        if let Some(limit) = query.limit {
            stmt = stmt.bind(limit).bind(query.offset);
        }

        let rows = stmt.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(MenuNode::from).collect())
    }

    /// Insert a new row at the end of its sibling group
    pub async fn create(&self, new: &NewMenu, actor: &str) -> Result<MenuNode, MenuError> {
        let now = Utc::now().to_rfc3339();

        let next_index: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(order_index) + 1, 0) FROM menus WHERE parent_id IS ?",
        )
        .bind(new.parent_id)
        .fetch_one(&self.pool)
        .await?;

        let roles_json = serde_json::to_string(&new.roles).unwrap_or_else(|_| "[]".to_string());
        let meta_json = new.meta.as_ref().map(|m| m.to_string());

        let result = sqlx::query(
            r#"
            INSERT INTO menus
                (parent_id, key_name, label, icon, path, roles, is_active,
                 order_index, meta, created_at, updated_at, updated_by)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.parent_id)
        .bind(&new.key_name)
        .bind(&new.label)
        .bind(&new.icon)
        .bind(&new.path)
        .bind(&roles_json)
        .bind(new.is_active as i64)
        .bind(next_index)
        .bind(&meta_json)
        .bind(&now)
        .bind(&now)
        .bind(actor)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &new.key_name))?;

        let id = result.last_insert_rowid();
        match self.fetch(id).await? {
            Some(node) => Ok(node),
            None => Err(MenuError::Database(sqlx::Error::RowNotFound)),
        }
    }

    /// Partial update; returns `None` when the id does not exist.
    /// An empty patch returns the current row without touching it.
    pub async fn update(
        &self,
        id: i64,
        patch: &MenuPatch,
        actor: &str,
    ) -> Result<Option<MenuNode>, MenuError> {
        if patch.is_empty() {
            return self.fetch(id).await;
        }

        let mut qb = sqlx::QueryBuilder::<sqlx::Sqlite>::new("UPDATE menus SET ");
        let mut fields = qb.separated(", ");

        if let Some(key_name) = &patch.key_name {
            fields.push("key_name = ").push_bind_unseparated(key_name.clone());
        }
        if let Some(label) = &patch.label {
            fields.push("label = ").push_bind_unseparated(label.clone());
        }
        if let Some(icon) = &patch.icon {
            fields.push("icon = ").push_bind_unseparated(icon.clone());
        }
        if let Some(path) = &patch.path {
            fields.push("path = ").push_bind_unseparated(path.clone());
        }
        if let Some(roles) = &patch.roles {
            let roles_json = serde_json::to_string(roles).unwrap_or_else(|_| "[]".to_string());
            fields.push("roles = ").push_bind_unseparated(roles_json);
        }
        if let Some(is_active) = patch.is_active {
            fields.push("is_active = ").push_bind_unseparated(is_active as i64);
        }
        if let Some(meta) = &patch.meta {
            let meta_json = meta.as_ref().map(|m| m.to_string());
            fields.push("meta = ").push_bind_unseparated(meta_json);
        }

        let now = Utc::now().to_rfc3339();
        fields.push("updated_at = ").push_bind_unseparated(now);
        fields.push("updated_by = ").push_bind_unseparated(actor.to_string());

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, patch.key_name.as_deref().unwrap_or("")))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch(id).await
    }

    /// Soft delete (is_active = 0) or hard row removal.
    /// Returns whether a row was affected.
    pub async fn delete(&self, id: i64, hard: bool, actor: &str) -> Result<bool, MenuError> {
        let result = if hard {
            sqlx::query("DELETE FROM menus WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await?
        } else {
            sqlx::query("UPDATE menus SET is_active = 0, updated_at = ?, updated_by = ? WHERE id = ?")
                .bind(Utc::now().to_rfc3339())
                .bind(actor)
                .bind(id)
                .execute(&self.pool)
                .await?
        };
        Ok(result.rows_affected() > 0)
    }

    /// Number of active children directly under a node (soft-delete guard)
    pub async fn active_child_count(&self, id: i64) -> Result<i64, MenuError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM menus WHERE parent_id = ? AND is_active = 1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Apply a validated placement batch atomically (all-or-nothing)
    pub async fn reorder_batch(
        &self,
        placements: &[NormalizedPlacement],
        actor: &str,
    ) -> Result<(), MenuError> {
        if placements.is_empty() {
            return Ok(());
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for placement in placements {
            sqlx::query(
                "UPDATE menus SET parent_id = ?, order_index = ?, updated_at = ?, updated_by = ? \
                 WHERE id = ?",
            )
            .bind(placement.parent_id)
            .bind(placement.order_index)
            .bind(&now)
            .bind(actor)
            .bind(placement.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

fn map_unique_violation(err: sqlx::Error, key_name: &str) -> MenuError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            MenuError::DuplicateKey(key_name.to_string())
        }
        _ => MenuError::Database(err),
    }
}
