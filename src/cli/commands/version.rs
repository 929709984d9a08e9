//! Version command implementation.
//!
//! The `vouch version` command verifies that an exact version of a package
//! is installed. Every strategy runs once; there is no retry.

use async_trait::async_trait;

use crate::cli::args::VersionArgs;
use crate::error::Result;
use crate::strategies::build_verifier;
use crate::ui::UserInterface;

use super::dispatcher::{
    cancellation_signal, Command, CommandResult, ConfigLocation, EXIT_CONFIG_MISSING,
};
use super::display::finish;

/// The version command implementation.
pub struct VersionCommand {
    location: ConfigLocation,
    args: VersionArgs,
}

impl VersionCommand {
    /// Create a new version command.
    pub fn new(location: ConfigLocation, args: VersionArgs) -> Self {
        Self { location, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &VersionArgs {
        &self.args
    }
}

#[async_trait]
impl Command for VersionCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.location.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_CONFIG_MISSING));
        };
        let verifier = build_verifier(&config)?;

        let cancel = cancellation_signal(self.args.timeout);
        let result = verifier
            .verify_version(&self.args.package, &self.args.version, &cancel)
            .await;

        let subject = format!("'{}' {}", self.args.package, self.args.version);
        finish(ui, self.args.json, &subject, result)
    }
}
