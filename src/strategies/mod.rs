//! Concrete detection strategies.
//!
//! Each mechanism is a [`Probe`](crate::verification::Probe) wrapped in a
//! [`GuardedStrategy`]; [`build_strategies`] turns configuration entries
//! into ready-to-use strategies.

pub mod command;
pub mod file;
pub mod path;
pub mod process;

use std::sync::Arc;

use regex::Regex;

use crate::config::{StrategyConfig, StrategyKind, VouchConfig};
use crate::error::{Result, VouchError};
use crate::verification::{CompositeVerifier, GuardedStrategy, VerificationStrategy};

pub use command::CommandProbe;
pub use file::FileProbe;
pub use path::{is_executable, resolve_tool_path, PathProbe};

/// Substitute `{package}` and `{version}` placeholders.
pub fn expand_template(template: &str, package_id: &str, version: Option<&str>) -> String {
    let expanded = template.replace("{package}", package_id);
    match version {
        Some(v) => expanded.replace("{version}", v),
        None => expanded,
    }
}

/// Build one strategy from its configuration.
pub fn build_strategy(config: &StrategyConfig) -> Result<Arc<dyn VerificationStrategy>> {
    let pattern = config
        .kind
        .version_pattern()
        .map(|p| {
            Regex::new(p).map_err(|e| VouchError::ConfigValidationError {
                message: format!("Strategy '{}' has an invalid version_pattern: {}", config.name, e),
            })
        })
        .transpose()?;

    let strategy: Arc<dyn VerificationStrategy> = match &config.kind {
        StrategyKind::Command {
            command,
            version_command,
            ..
        } => Arc::new(GuardedStrategy::new(
            &config.name,
            config.priority,
            CommandProbe::new(command, version_command.as_deref(), pattern),
        )?),
        StrategyKind::File {
            paths,
            version_file,
        } => Arc::new(GuardedStrategy::new(
            &config.name,
            config.priority,
            FileProbe::new(paths.clone(), version_file.clone()),
        )?),
        StrategyKind::Path {
            binary,
            version_args,
            ..
        } => Arc::new(GuardedStrategy::new(
            &config.name,
            config.priority,
            PathProbe::new(binary, version_args.clone(), pattern),
        )?),
    };

    Ok(strategy)
}

/// Build every configured strategy, in configuration order.
pub fn build_strategies(configs: &[StrategyConfig]) -> Result<Vec<Arc<dyn VerificationStrategy>>> {
    configs.iter().map(build_strategy).collect()
}

/// Build a composite verifier from a loaded configuration.
pub fn build_verifier(config: &VouchConfig) -> Result<CompositeVerifier> {
    let strategies = build_strategies(&config.strategies)?;
    Ok(CompositeVerifier::new(strategies).with_policy(config.settings.retry_policy()))
}
