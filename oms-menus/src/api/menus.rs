//! Menu CRUD handlers
//!
//! Request bodies are validated once at this boundary; everything past it
//! works with typed values. All responses use the `{ ok, ... }` envelope
//! the admin front-end expects.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::db::{MenuPatch, NewMenu};
use crate::error::MenuError;
use crate::query::{ListMenusQuery, RawListParams};
use crate::AppState;

use super::actor_from_headers;

const MAX_TEXT_LEN: usize = 255;

/// Distinguishes "field absent" from "field explicitly null" for nullable
/// columns in PATCH-style bodies
fn explicit<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuRequest {
    pub parent_id: Option<i64>,
    pub key_name: String,
    pub label: String,
    pub icon: Option<String>,
    pub path: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub order_index: Option<i64>,
    pub meta: Option<serde_json::Value>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMenuRequest {
    #[serde(default, deserialize_with = "explicit")]
    pub parent_id: Option<Option<i64>>,
    /// Not updatable here; rejected with a pointer at the reorder endpoint
    pub order_index: Option<i64>,
    pub key_name: Option<String>,
    pub label: Option<String>,
    #[serde(default, deserialize_with = "explicit")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub path: Option<Option<String>>,
    pub roles: Option<Vec<String>>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "explicit")]
    pub meta: Option<Option<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub hard: Option<String>,
}

/// GET /menus
pub async fn list_menus(
    State(state): State<AppState>,
    Query(raw): Query<RawListParams>,
) -> Result<Json<serde_json::Value>, MenuError> {
    let query = ListMenusQuery::from_raw(raw)?;
    let menus = state.service.list(&query).await?;
    Ok(Json(json!({ "ok": true, "menus": menus })))
}

/// POST /menus
pub async fn create_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), MenuError> {
    let mut errors = Vec::new();
    check_required_text("key_name", &body.key_name, &mut errors);
    check_required_text("label", &body.label, &mut errors);
    if let Some(index) = body.order_index {
        if index < 0 {
            errors.push("order_index must be a non-negative integer".to_string());
        }
    }
    check_meta(body.meta.as_ref(), &mut errors);
    if !errors.is_empty() {
        return Err(MenuError::Validation(errors));
    }

    let actor = actor_from_headers(&headers);
    let new = NewMenu {
        parent_id: body.parent_id,
        key_name: body.key_name,
        label: body.label,
        icon: body.icon,
        path: body.path,
        roles: body.roles,
        is_active: body.is_active,
        meta: body.meta,
    };

    let menu = state.service.create(new, body.order_index, &actor).await?;
    Ok((StatusCode::CREATED, Json(json!({ "ok": true, "menu": menu }))))
}

/// PUT /menus/:id
pub async fn update_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<UpdateMenuRequest>,
) -> Result<Json<serde_json::Value>, MenuError> {
    let mut errors = Vec::new();
    if body.order_index.is_some() {
        errors.push("order_index cannot be set here; use POST /menus/reorder".to_string());
    }
    if let Some(key_name) = &body.key_name {
        check_required_text("key_name", key_name, &mut errors);
    }
    if let Some(label) = &body.label {
        check_required_text("label", label, &mut errors);
    }
    if let Some(Some(meta)) = &body.meta {
        check_meta(Some(meta), &mut errors);
    }
    if !errors.is_empty() {
        return Err(MenuError::Validation(errors));
    }

    let actor = actor_from_headers(&headers);
    let patch = MenuPatch {
        key_name: body.key_name,
        label: body.label,
        icon: body.icon,
        path: body.path,
        roles: body.roles,
        is_active: body.is_active,
        meta: body.meta,
    };

    match state.service.update(id, body.parent_id, patch, &actor).await? {
        Some(menu) => Ok(Json(json!({ "ok": true, "menu": menu }))),
        None => Err(MenuError::NotFound),
    }
}

/// DELETE /menus/:id?hard=1
pub async fn delete_menu(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<DeleteParams>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, MenuError> {
    let hard = matches!(params.hard.as_deref(), Some("1") | Some("true"));
    let actor = actor_from_headers(&headers);

    state.service.delete(id, hard, &actor).await?;
    Ok(Json(json!({ "ok": true })))
}

fn check_required_text(field: &str, value: &str, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{} must be a non-empty string", field));
    } else if value.len() > MAX_TEXT_LEN {
        errors.push(format!("{} must be at most {} characters", field, MAX_TEXT_LEN));
    }
}

fn check_meta(meta: Option<&serde_json::Value>, errors: &mut Vec<String>) {
    if let Some(meta) = meta {
        if !meta.is_object() {
            errors.push("meta must be a JSON object".to_string());
        }
    }
}
