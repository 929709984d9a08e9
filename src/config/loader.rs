//! Configuration file discovery and loading.
//!
//! Lookup order (first hit wins, files are not merged):
//! 1. An explicit path (`--config`)
//! 2. `.vouch/config.yml` in the start directory or any ancestor
//! 3. The user config (`~/.vouch/config.yml`)

use crate::config::schema::VouchConfig;
use crate::config::validator::validate;
use crate::error::{Result, VouchError};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory holding Vouch configuration.
pub const CONFIG_DIR: &str = ".vouch";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yml";

/// Find the nearest project config by walking up from `start`.
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// The user-level config path, if it exists.
pub fn find_user_config() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(CONFIG_DIR).join(CONFIG_FILE);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Resolve which config file to use.
///
/// # Errors
///
/// Returns `ConfigNotFound` when no candidate exists. The reported path is
/// the explicit override, or the project location under `start`.
pub fn resolve_config_path(start: &Path, config_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_override {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(VouchError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    find_project_config(start)
        .or_else(find_user_config)
        .ok_or_else(|| VouchError::ConfigNotFound {
            path: start.join(CONFIG_DIR).join(CONFIG_FILE),
        })
}

/// Load a single config file and parse it into [`VouchConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<VouchConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            VouchError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            VouchError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into [`VouchConfig`].
///
/// # Arguments
///
/// * `content` - The YAML content to parse
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, source_path: &Path) -> Result<VouchConfig> {
    if content.trim().is_empty() {
        return Ok(VouchConfig::default());
    }
    serde_yaml::from_str(content).map_err(|e| VouchError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Discover, load and validate the configuration.
pub fn load_config(start: &Path, config_override: Option<&Path>) -> Result<VouchConfig> {
    let path = resolve_config_path(start, config_override)?;
    tracing::debug!(path = %path.display(), "Loading configuration");
    let config = load_config_file(&path)?;
    validate(&config)?;
    Ok(config)
}
