//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "oms-admin.db";

/// Resolve the root folder for service data, in priority order:
/// 1. `OMS_ROOT_FOLDER` environment variable (highest priority)
/// 2. `OMS_ROOT` environment variable
/// 3. `root_folder` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder() -> PathBuf {
    // Priority 1 and 2: environment variables
    for var in ["OMS_ROOT_FOLDER", "OMS_ROOT"] {
        if let Ok(path) = std::env::var(var) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Resolve the listen port for a service from an environment variable,
/// falling back to the compiled default when unset or malformed.
pub fn resolve_port(env_var: &str, default: u16) -> u16 {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Ensure the root folder exists, and return the database path within it.
pub fn prepare_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)?;
    Ok(root.join(DATABASE_FILE))
}

/// Locate the platform config file (`orthodoxmetrics/config.toml`)
fn locate_config_file() -> Result<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("orthodoxmetrics").join("config.toml"));

    if let Some(path) = user_config {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/orthodoxmetrics/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("orthodoxmetrics"))
        .unwrap_or_else(|| PathBuf::from("./oms_data"))
}
