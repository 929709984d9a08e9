//! Configuration schema definitions for Vouch.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::verification::RetryPolicy;

/// Root configuration structure for `.vouch/config.yml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VouchConfig {
    /// Retry timing for presence checks
    pub settings: Settings,

    /// Detection strategies, in any order (sorted by priority at build time)
    pub strategies: Vec<StrategyConfig>,
}

/// Global settings for presence verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds to wait before the first attempt
    pub warm_up_secs: u64,

    /// Total number of presence attempts
    pub max_attempts: u32,

    /// Backoff unit in seconds; attempt N is followed by N units
    pub backoff_step_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            warm_up_secs: 2,
            max_attempts: 3,
            backoff_step_secs: 1,
        }
    }
}

impl Settings {
    /// Convert into the engine's retry policy.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            warm_up: Duration::from_secs(self.warm_up_secs),
            max_attempts: self.max_attempts.max(1),
            backoff_step: Duration::from_secs(self.backoff_step_secs),
        }
    }
}

/// One configured detection strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Unique, non-empty strategy name
    pub name: String,

    /// Evaluation priority (lower runs first)
    #[serde(default)]
    pub priority: i32,

    /// Mechanism-specific settings
    #[serde(flatten)]
    pub kind: StrategyKind,
}

/// The detection mechanism behind a strategy.
///
/// Every string field accepts the `{package}` placeholder; version-related
/// fields also accept `{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Shell command; exit 0 means installed.
    Command {
        /// Presence command
        command: String,

        /// Dedicated exact-version command (exit 0 means that version is installed)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_command: Option<String>,

        /// Regex extracting the installed version from stdout
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_pattern: Option<String>,
    },

    /// Filesystem markers; any existing path means installed.
    File {
        /// Candidate marker paths
        paths: Vec<String>,

        /// File whose trimmed contents are the installed version
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_file: Option<String>,
    },

    /// Executable on PATH.
    Path {
        /// Binary name to resolve
        binary: String,

        /// Arguments that make the binary print its version
        #[serde(default = "default_version_args")]
        version_args: Vec<String>,

        /// Regex extracting the version from that output
        #[serde(default, skip_serializing_if = "Option::is_none")]
        version_pattern: Option<String>,
    },
}

fn default_version_args() -> Vec<String> {
    vec!["--version".to_string()]
}

impl StrategyKind {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Command { .. } => "command",
            Self::File { .. } => "file",
            Self::Path { .. } => "path",
        }
    }

    /// The configured version pattern, if any.
    pub fn version_pattern(&self) -> Option<&str> {
        match self {
            Self::Command {
                version_pattern, ..
            }
            | Self::Path {
                version_pattern, ..
            } => version_pattern.as_deref(),
            Self::File { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_to_standard_schedule() {
        let policy = Settings::default().retry_policy();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: VouchConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.settings, Settings::default());
        assert!(config.strategies.is_empty());
    }

    #[test]
    fn parses_all_strategy_types() {
        let yaml = r#"
settings:
  warm_up_secs: 0
strategies:
  - name: PackageManager
    priority: 2
    type: command
    command: "dpkg -s {package}"
    version_pattern: 'Version: (\S+)'
  - name: Registry
    priority: 1
    type: file
    paths: ["/opt/{package}/installed"]
    version_file: "/opt/{package}/VERSION"
  - name: Binary
    type: path
    binary: "{package}"
"#;
        let config: VouchConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.settings.warm_up_secs, 0);
        assert_eq!(config.settings.max_attempts, 3);
        assert_eq!(config.strategies.len(), 3);

        let pm = &config.strategies[0];
        assert_eq!(pm.priority, 2);
        assert_eq!(pm.kind.label(), "command");
        assert_eq!(pm.kind.version_pattern(), Some(r"Version: (\S+)"));

        let registry = &config.strategies[1];
        assert!(matches!(
            &registry.kind,
            StrategyKind::File { paths, version_file: Some(_) } if paths.len() == 1
        ));

        let binary = &config.strategies[2];
        assert_eq!(binary.priority, 0);
        assert!(matches!(
            &binary.kind,
            StrategyKind::Path { version_args, .. } if version_args == &["--version"]
        ));
    }

    #[test]
    fn unknown_strategy_type_is_rejected() {
        let yaml = r#"
strategies:
  - name: Odd
    type: telepathy
"#;
        assert!(serde_yaml::from_str::<VouchConfig>(yaml).is_err());
    }

    #[test]
    fn zero_attempts_are_clamped_in_policy() {
        let settings = Settings {
            max_attempts: 0,
            ..Default::default()
        };
        assert_eq!(settings.retry_policy().max_attempts, 1);
    }
}
