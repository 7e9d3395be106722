//! oms-menus - Menu Studio backend service
//!
//! Serves the admin navigation menu API: nested tree reads, CRUD, and
//! atomic batch reordering with cycle prevention.

use anyhow::Result;
use oms_common::{config, db};
use oms_menus::{build_router, AppState};
use tracing::{error, info};

/// Default listen port, overridable via OMS_MENUS_PORT
const DEFAULT_PORT: u16 = 5780;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting OrthodoxMetrics Menu Studio (oms-menus) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let root_folder = config::resolve_root_folder();
    let db_path = config::prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = match db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool);
    let app = build_router(state);

    let port = config::resolve_port("OMS_MENUS_PORT", DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("oms-menus listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
