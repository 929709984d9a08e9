//! Shared display helpers for verification outcomes.
//!
//! Used by `check` and `version` so both render outcomes the same way.

use anyhow::Context;

use crate::error::{Result, VouchError};
use crate::ui::UserInterface;
use crate::verification::VerificationOutcome;

use super::dispatcher::{CommandResult, EXIT_CANCELLED, EXIT_NOT_VERIFIED};

/// Write an outcome as pretty-printed JSON.
pub fn show_json(ui: &mut dyn UserInterface, outcome: &VerificationOutcome) -> Result<()> {
    let json = serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
    ui.raw(&json);
    Ok(())
}

/// Render an outcome for humans.
///
/// `subject` names what was checked, e.g. `'ripgrep'` or `'ripgrep' 14.1.0`.
pub fn show_outcome(ui: &mut dyn UserInterface, subject: &str, outcome: &VerificationOutcome) {
    if outcome.verified {
        ui.success(&format!("{} verified by {}", subject, outcome.method));
        if let Some(ref installed) = outcome.installed_version {
            ui.detail(&format!("Installed version: {}", installed));
        }
        for detail in &outcome.details {
            ui.detail(detail);
        }
        return;
    }

    let message = outcome
        .failure_message()
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} could not be verified", subject));

    // A mismatch means the package is there, just not at the wanted version.
    if outcome.installed_version.is_some() && !outcome.is_composite() {
        ui.warning(&message);
    } else {
        ui.error(&message);
    }

    for detail in &outcome.details {
        ui.detail(detail);
    }
    if let Some(ref diagnostics) = outcome.diagnostics {
        for inner in &diagnostics.outcomes {
            let line = match inner.failure_message() {
                Some(msg) => format!("{}: {}", inner.method, msg),
                None => format!("{}: not verified", inner.method),
            };
            ui.detail(&line);
        }
    }
}

/// Map a finished verification onto an exit status, rendering it first.
pub fn finish(
    ui: &mut dyn UserInterface,
    json: bool,
    subject: &str,
    result: Result<VerificationOutcome>,
) -> Result<CommandResult> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(VouchError::Cancelled) => {
            ui.error("Verification cancelled");
            return Ok(CommandResult::failure(EXIT_CANCELLED));
        }
        Err(e) => return Err(e),
    };

    if json {
        show_json(ui, &outcome)?;
    } else {
        show_outcome(ui, subject, &outcome);
    }

    if outcome.verified {
        Ok(CommandResult::success())
    } else {
        Ok(CommandResult::failure(EXIT_NOT_VERIFIED))
    }
}
