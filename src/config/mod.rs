//! Configuration loading, parsing, and validation for Vouch.
//!
//! This module handles all aspects of configuration:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use vouch::config::{load_config, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let vouch_dir = temp.path().join(".vouch");
//! fs::create_dir_all(&vouch_dir).unwrap();
//! fs::write(
//!     vouch_dir.join("config.yml"),
//!     "strategies:\n  - name: Shell\n    type: command\n    command: \"true\"\n",
//! )
//! .unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! validate(&config).unwrap();
//! assert_eq!(config.strategies[0].name, "Shell");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

// Schema re-exports
pub use schema::{Settings, StrategyConfig, StrategyKind, VouchConfig};

// Loader re-exports
pub use loader::{
    find_project_config, find_user_config, load_config, load_config_file, parse_config,
    resolve_config_path, CONFIG_DIR, CONFIG_FILE,
};

// Validator re-exports
pub use validator::{validate, validate_config, ValidationError};
