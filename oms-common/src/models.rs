//! Database models shared across the admin services

use serde::{Deserialize, Serialize};

/// One entry in the hierarchical navigation menu.
///
/// `parent_id == None` means the node is a root; multiple roots form a
/// forest. Within a sibling group (same `parent_id`) `order_index` values
/// are kept dense: 0..N-1 with no gaps or duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub key_name: String,
    pub label: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub order_index: i64,
    pub meta: Option<serde_json::Value>,
    pub created_at: String,
    pub updated_at: String,
    pub updated_by: Option<String>,
}

/// A menu node with its children nested, as served by `GET /menus/tree`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuTreeNode {
    #[serde(flatten)]
    pub node: MenuNode,
    pub children: Vec<MenuTreeNode>,
}

/// Parse a `roles` column value (JSON array of strings stored as TEXT).
///
/// Malformed or non-array content degrades to an empty list rather than
/// failing the whole row.
pub fn parse_roles(raw: &str) -> Vec<String> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse a `meta` column value (arbitrary JSON object stored as TEXT).
///
/// Anything other than a JSON object degrades to `None`.
pub fn parse_meta(raw: Option<&str>) -> Option<serde_json::Value> {
    let raw = raw?;
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value @ serde_json::Value::Object(_)) => Some(value),
        _ => None,
    }
}
