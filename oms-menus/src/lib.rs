//! oms-menus library - Menu Studio backend
//!
//! CRUD, hierarchical tree assembly, and reorder validation for the
//! OrthodoxMetrics admin navigation menus.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod query;
pub mod reorder;
pub mod service;
pub mod tree;

use service::MenuService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MenuService,
}

impl AppState {
    /// Create new application state
    pub fn new(pool: SqlitePool) -> Self {
        Self { service: MenuService::new(pool) }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    Router::new()
        .route("/menus/tree", get(api::get_menu_tree))
        .route("/menus", get(api::list_menus).post(api::create_menu))
        .route("/menus/:id", put(api::update_menu).delete(api::delete_menu))
        .route("/menus/reorder", post(api::reorder_menus))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        // The studio front-end is served from a different origin in dev
        .layer(CorsLayer::permissive())
        .with_state(state)
}
