//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vouch - Post-install package verification.
#[derive(Debug, Parser)]
#[command(name = "vouch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides .vouch/config.yml discovery)
    #[arg(short, long, global = true, env = "VOUCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show per-strategy details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Verify that a package is installed
    Check(CheckArgs),

    /// Verify that a package is installed at an exact version
    Version(VersionArgs),

    /// List configured strategies in evaluation order
    List(ListArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Package identifier
    pub package: String,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `version` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct VersionArgs {
    /// Package identifier
    pub package: String,

    /// Exact version expected to be installed
    pub version: String,

    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListArgs {
    /// Print the strategies as JSON
    #[arg(long)]
    pub json: bool,
}
