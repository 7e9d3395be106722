//! Batch reorder endpoint

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::MenuError;
use crate::reorder::ReorderItem;
use crate::AppState;

use super::actor_from_headers;

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

/// POST /menus/reorder
///
/// Applies a proposed placement batch atomically. Validation (existence,
/// cycle check, dense reindexing) runs before any row is written; on
/// failure nothing is persisted.
pub async fn reorder_menus(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ReorderRequest>,
) -> Result<Json<serde_json::Value>, MenuError> {
    let mut errors = Vec::new();
    if body.items.is_empty() {
        errors.push("items must not be empty".to_string());
    }
    for item in &body.items {
        if item.order_index < 0 {
            errors.push(format!("order_index for id {} must be non-negative", item.id));
        }
    }
    if !errors.is_empty() {
        return Err(MenuError::Validation(errors));
    }

    let actor = actor_from_headers(&headers);
    state.service.reorder(&body.items, &actor).await?;

    Ok(Json(json!({ "ok": true })))
}
