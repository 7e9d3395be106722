//! Errors shared by the admin service binaries
//!
//! Covers the concerns `oms-common` itself owns: storage bring-up, file
//! system access, and configuration resolution. Request-level failures
//! live in each service's own error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file missing or unusable
    #[error("Configuration error: {0}")]
    Config(String),
}
