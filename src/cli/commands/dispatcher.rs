//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::cli::args::{Cli, Commands};
use crate::config::{load_config, VouchConfig};
use crate::error::{Result, VouchError};
use crate::ui::UserInterface;
use crate::verification::{CancellationSignal, CancellationSource};

/// Exit code when verification did not succeed.
pub const EXIT_NOT_VERIFIED: i32 = 1;

/// Exit code when no configuration could be found.
pub const EXIT_CONFIG_MISSING: i32 = 2;

/// Exit code after Ctrl-C or `--timeout`.
pub const EXIT_CANCELLED: i32 = 130;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
#[async_trait]
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }

    /// Exit status for the process; out-of-range codes become 1.
    pub fn process_exit_code(&self) -> u8 {
        u8::try_from(self.exit_code).unwrap_or(1)
    }
}

/// Where commands look for their configuration.
#[derive(Debug, Clone)]
pub struct ConfigLocation {
    /// Directory discovery starts from.
    pub working_dir: PathBuf,

    /// Explicit `--config` path.
    pub config_override: Option<PathBuf>,
}

impl ConfigLocation {
    /// Load and validate the configuration.
    ///
    /// A missing configuration is reported on the UI and returned as
    /// `Ok(None)` so callers can exit with [`EXIT_CONFIG_MISSING`].
    pub fn load(&self, ui: &mut dyn UserInterface) -> Result<Option<VouchConfig>> {
        match load_config(&self.working_dir, self.config_override.as_deref()) {
            Ok(config) => Ok(Some(config)),
            Err(VouchError::ConfigNotFound { path }) => {
                ui.error(&format!(
                    "No configuration found (looked for {}). Create .vouch/config.yml or pass --config.",
                    path.display()
                ));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Build the cancellation signal for one verification run.
///
/// Ctrl-C always cancels; `timeout_secs` adds a deadline.
pub fn cancellation_signal(timeout_secs: Option<u64>) -> CancellationSignal {
    let source = CancellationSource::new();
    let signal = source.signal();
    source.cancel_on_ctrl_c();
    if let Some(secs) = timeout_secs {
        source.cancel_after(Duration::from_secs(secs));
    }
    signal
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    location: ConfigLocation,
}

impl CommandDispatcher {
    /// Create a new dispatcher.
    pub fn new(working_dir: PathBuf, config_override: Option<PathBuf>) -> Self {
        Self {
            location: ConfigLocation {
                working_dir,
                config_override,
            },
        }
    }

    /// Get the working directory.
    pub fn working_dir(&self) -> &Path {
        &self.location.working_dir
    }

    /// Dispatch and execute a command.
    pub async fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Commands::Check(args) => {
                let cmd = super::check::CheckCommand::new(self.location.clone(), args.clone());
                cmd.execute(ui).await
            }
            Commands::Version(args) => {
                let cmd = super::version::VersionCommand::new(self.location.clone(), args.clone());
                cmd.execute(ui).await
            }
            Commands::List(args) => {
                let cmd = super::list::ListCommand::new(self.location.clone(), args.clone());
                cmd.execute(ui).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};

    #[test]
    fn command_result_success() {
        let result = CommandResult::success();
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
    }

    #[test]
    fn command_result_failure() {
        let result = CommandResult::failure(EXIT_NOT_VERIFIED);
        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
    }

    #[test]
    fn process_exit_code_never_truncates() {
        assert_eq!(CommandResult::failure(EXIT_CANCELLED).process_exit_code(), 130);
        assert_eq!(CommandResult::failure(256).process_exit_code(), 1);
        assert_eq!(CommandResult::failure(-1).process_exit_code(), 1);
    }

    #[test]
    fn dispatcher_creation() {
        let dispatcher = CommandDispatcher::new(PathBuf::from("/test"), None);
        assert_eq!(dispatcher.working_dir(), Path::new("/test"));
    }

    #[test]
    fn missing_config_is_reported() {
        let temp = tempfile::TempDir::new().unwrap();
        let location = ConfigLocation {
            working_dir: temp.path().to_path_buf(),
            config_override: Some(temp.path().join("absent.yml")),
        };
        let mut ui = MockUI::new(OutputMode::Normal);

        assert!(location.load(&mut ui).unwrap().is_none());
        assert!(ui.has_error("No configuration found"));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_cancels_signal() {
        let signal = cancellation_signal(Some(3));
        assert!(!signal.is_cancelled());
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }
}
