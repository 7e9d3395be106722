//! Database initialization for the admin services
//!
//! Creates the SQLite database on first run and brings the schema up
//! idempotently, so every service binary can start against an empty root
//! folder without manual setup.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Initialize the database connection pool and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    configure_connection(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

/// Initialize an in-memory database with the full schema.
///
/// Capped at a single connection: each pooled connection would otherwise
/// open its own private `:memory:` database. Intended for tests.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    configure_connection(&pool).await?;
    create_schema(&pool).await?;

    Ok(pool)
}

async fn configure_connection(pool: &SqlitePool) -> Result<()> {
    // WAL mode allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL").execute(pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(pool).await?;

    Ok(())
}

/// Create all tables (idempotent - safe to call multiple times)
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS menus (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            -- Deliberately not an enforced foreign key: hard-deleting a
            -- parent leaves children with a dangling parent_id, which the
            -- tree endpoint surfaces as orphan diagnostics. Parent
            -- existence is validated in the service layer.
            parent_id INTEGER,
            key_name TEXT NOT NULL UNIQUE,
            label TEXT NOT NULL,
            icon TEXT,
            path TEXT,
            roles TEXT NOT NULL DEFAULT '[]',
            is_active INTEGER NOT NULL DEFAULT 1,
            order_index INTEGER NOT NULL DEFAULT 0,
            meta TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            updated_by TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_menus_parent_order ON menus(parent_id, order_index)")
        .execute(pool)
        .await?;

    Ok(())
}
