//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Strategy names must be non-empty and unique
//! - Commands and binaries must be non-empty
//! - File strategies need at least one path
//! - Version patterns must compile
//! - At least one presence attempt

use crate::config::schema::{StrategyKind, VouchConfig};
use crate::error::{Result, VouchError};
use std::collections::HashSet;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Strategy name if error is strategy-specific
    pub strategy: Option<String>,
}

impl ValidationError {
    fn strategy(rule: &str, strategy: &str, message: String) -> Self {
        Self {
            rule: rule.to_string(),
            message,
            strategy: Some(strategy.to_string()),
        }
    }
}

/// Validate a configuration and return all errors.
///
/// Collects every error rather than stopping at the first one.
pub fn validate_config(config: &VouchConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.settings.max_attempts == 0 {
        errors.push(ValidationError {
            rule: "zero-attempts".to_string(),
            message: "settings.max_attempts must be at least 1".to_string(),
            strategy: None,
        });
    }

    errors.extend(validate_strategies(config));
    errors
}

fn validate_strategies(config: &VouchConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, strategy) in config.strategies.iter().enumerate() {
        let name = strategy.name.trim();
        if name.is_empty() {
            errors.push(ValidationError {
                rule: "empty-name".to_string(),
                message: format!("Strategy #{} has an empty name", index + 1),
                strategy: None,
            });
            continue;
        }

        if !seen.insert(name) {
            errors.push(ValidationError::strategy(
                "duplicate-name",
                name,
                format!("Strategy name '{}' is used more than once", name),
            ));
        }

        match &strategy.kind {
            StrategyKind::Command { command, .. } if command.trim().is_empty() => {
                errors.push(ValidationError::strategy(
                    "empty-command",
                    name,
                    format!("Strategy '{}' has an empty command", name),
                ));
            }
            StrategyKind::File { paths, .. } if paths.iter().all(|p| p.trim().is_empty()) => {
                errors.push(ValidationError::strategy(
                    "missing-paths",
                    name,
                    format!("Strategy '{}' must list at least one path", name),
                ));
            }
            StrategyKind::Path { binary, .. } if binary.trim().is_empty() => {
                errors.push(ValidationError::strategy(
                    "empty-binary",
                    name,
                    format!("Strategy '{}' has an empty binary", name),
                ));
            }
            _ => {}
        }

        if let Some(pattern) = strategy.kind.version_pattern() {
            if let Err(e) = regex::Regex::new(pattern) {
                errors.push(ValidationError::strategy(
                    "invalid-version-pattern",
                    name,
                    format!("Strategy '{}' has an invalid version_pattern: {}", name, e),
                ));
            }
        }
    }

    errors
}

/// Validate a configuration, failing with all messages joined.
pub fn validate(config: &VouchConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(VouchError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
