//! Nested menu tree endpoint

use axum::{extract::State, Json};
use serde_json::json;
use tracing::warn;

use crate::error::MenuError;
use crate::AppState;

/// GET /menus/tree
///
/// Returns the active menu forest, nested, siblings ordered by
/// `order_index`. Nodes whose parent is missing or inactive are promoted to
/// roots and reported in an `orphans` array so the studio UI can flag them
/// instead of silently flattening the hierarchy.
pub async fn get_menu_tree(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, MenuError> {
    let build = state.service.tree().await?;

    let mut body = json!({ "ok": true, "tree": build.roots });
    if !build.orphans.is_empty() {
        warn!("menu tree has orphaned nodes (missing parents): {:?}", build.orphans);
        body["orphans"] = json!(build.orphans);
    }

    Ok(Json(body))
}
