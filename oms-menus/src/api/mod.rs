//! HTTP API handlers for oms-menus

use axum::http::HeaderMap;

pub mod health;
pub mod menus;
pub mod reorder;
pub mod tree;

pub use health::health_routes;
pub use menus::{create_menu, delete_menu, list_menus, update_menu};
pub use reorder::reorder_menus;
pub use tree::get_menu_tree;

/// Actor identity for audit stamping, taken from the `X-Actor` header the
/// admin gateway forwards. Authentication itself happens upstream.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-actor")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
