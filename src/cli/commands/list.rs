//! List command implementation.
//!
//! The `vouch list` command shows the configured strategies in the order
//! they are evaluated, plus the retry settings used by `vouch check`.

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;

use crate::cli::args::ListArgs;
use crate::config::{StrategyConfig, VouchConfig};
use crate::error::Result;
use crate::ui::theme::VouchTheme;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult, ConfigLocation, EXIT_CONFIG_MISSING};

/// The list command implementation.
pub struct ListCommand {
    location: ConfigLocation,
    args: ListArgs,
}

/// One row of `vouch list --json`.
#[derive(Debug, Serialize)]
struct StrategyRow<'a> {
    name: &'a str,
    priority: i32,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(location: ConfigLocation, args: ListArgs) -> Self {
        Self { location, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ListArgs {
        &self.args
    }
}

/// Strategies in evaluation order: ascending priority, ties in file order.
pub fn evaluation_order(config: &VouchConfig) -> Vec<&StrategyConfig> {
    let mut ordered: Vec<&StrategyConfig> = config.strategies.iter().collect();
    ordered.sort_by_key(|s| s.priority);
    ordered
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = self.location.load(ui)? else {
            return Ok(CommandResult::failure(EXIT_CONFIG_MISSING));
        };
        let ordered = evaluation_order(&config);

        if self.args.json {
            let rows: Vec<StrategyRow<'_>> = ordered
                .iter()
                .map(|s| StrategyRow {
                    name: &s.name,
                    priority: s.priority,
                    kind: s.kind.label(),
                })
                .collect();
            let json = serde_json::to_string_pretty(&rows).context("Failed to serialize strategies")?;
            ui.raw(&json);
            return Ok(CommandResult::success());
        }

        let theme = VouchTheme::detect();
        let settings = &config.settings;

        ui.message(&format!("  {}", theme.key.apply_to("Strategies:")));
        if ordered.is_empty() {
            ui.message(&format!("    {}", theme.dim.apply_to("(none configured)")));
        }
        for strategy in &ordered {
            ui.message(&format!(
                "    {} {}",
                theme.highlight.apply_to(&strategy.name),
                theme.dim.apply_to(format!(
                    "(priority {}, {})",
                    strategy.priority,
                    strategy.kind.label()
                )),
            ));
        }

        ui.message("");
        ui.message(&format!(
            "  {} warm-up {}s, {} attempts, backoff step {}s",
            theme.key.apply_to("Retry:"),
            settings.warm_up_secs,
            settings.max_attempts,
            settings.backoff_step_secs,
        ));

        Ok(CommandResult::success())
    }
}
