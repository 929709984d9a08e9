//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Configuration discovery and
//! cancellation setup are shared through [`ConfigLocation`] and
//! [`cancellation_signal`].

pub mod check;
pub mod dispatcher;
pub mod display;
pub mod list;
pub mod version;

pub use dispatcher::{
    cancellation_signal, Command, CommandDispatcher, CommandResult, ConfigLocation,
    EXIT_CANCELLED, EXIT_CONFIG_MISSING, EXIT_NOT_VERIFIED,
};
