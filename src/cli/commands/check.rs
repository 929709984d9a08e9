//! Check command implementation.
//!
//! The `vouch check` command verifies that a package is installed, retrying
//! with backoff while a fresh install settles.

use async_trait::async_trait;

use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::strategies::build_verifier;
use crate::ui::UserInterface;

use super::dispatcher::{
    cancellation_signal, Command, CommandResult, ConfigLocation, EXIT_CONFIG_MISSING,
};
use super::display::finish;

/// The check command implementation.
pub struct CheckCommand {
    location: ConfigLocation,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(location: ConfigLocation, args: CheckArgs) -> Self {
        Self { location, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.location.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_CONFIG_MISSING));
        };
        let verifier = build_verifier(&config)?;

        if !self.args.json {
            ui.message(&format!(
                "Checking '{}' with {} strategies...",
                self.args.package,
                verifier.strategies().len()
            ));
        }

        let cancel = cancellation_signal(self.args.timeout);
        let result = verifier.verify_presence(&self.args.package, &cancel).await;

        let subject = format!("'{}'", self.args.package);
        finish(ui, self.args.json, &subject, result)
    }
}
