//! # OrthodoxMetrics Common Library
//!
//! Shared code for the OrthodoxMetrics admin microservices including:
//! - Database models (menu nodes, nested tree nodes)
//! - Database initialization and schema creation
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{MenuNode, MenuTreeNode};
