//! Service error taxonomy and HTTP mapping
//!
//! Every failure surfaced to the admin front-end renders as the structured
//! `{ ok: false, reason, errors? }` envelope. Validation-class failures are
//! 400s, missing targets are 404s, key collisions are 409s, and anything
//! coming out of the storage layer is a 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::reorder::ReorderError;

#[derive(Debug, Error)]
pub enum MenuError {
    /// Malformed request body or query parameters
    #[error("validation failed")]
    Validation(Vec<String>),

    /// A referenced menu id (node or parent) does not exist
    #[error("unknown menu id {0}")]
    UnknownNode(i64),

    /// The proposed parent assignment would make a node its own ancestor
    #[error("reorder would create a cycle through menu id {0}")]
    Cycle(i64),

    /// Soft delete attempted on a node that still has active children
    #[error("menu {0} has active children")]
    HasActiveChildren(i64),

    /// Update/delete target id does not exist
    #[error("menu not found")]
    NotFound,

    /// Create attempted with a key_name that already exists
    #[error("key_name already exists: {0}")]
    DuplicateKey(String),

    /// Unclassified storage failure (not retried at this layer)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ReorderError> for MenuError {
    fn from(err: ReorderError) -> Self {
        match err {
            ReorderError::UnknownNode(id) => MenuError::UnknownNode(id),
            ReorderError::Cycle(id) => MenuError::Cycle(id),
        }
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let (status, reason, errors): (StatusCode, &str, Option<Vec<String>>) = match self {
            MenuError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, "validation_failed", Some(messages))
            }
            err @ (MenuError::UnknownNode(_) | MenuError::Cycle(_)) => (
                StatusCode::BAD_REQUEST,
                "validation_failed",
                Some(vec![err.to_string()]),
            ),
            MenuError::HasActiveChildren(_) => (StatusCode::BAD_REQUEST, "has_children", None),
            MenuError::NotFound => (StatusCode::NOT_FOUND, "not_found", None),
            MenuError::DuplicateKey(_) => (StatusCode::CONFLICT, "duplicate_key", None),
            MenuError::Database(err) => {
                error!("storage failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None)
            }
        };

        let mut body = json!({ "ok": false, "reason": reason });
        if let Some(errors) = errors {
            body["errors"] = json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
