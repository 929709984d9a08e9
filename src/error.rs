//! Error types for Vouch operations.
//!
//! This module defines [`VouchError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `VouchError` for errors the caller must handle distinctly
//! - Strategy failures never surface here; they become failed outcomes
//! - Cancellation is its own variant and is never folded into an outcome
//! - Use `anyhow::Error` (via `VouchError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Vouch operations.
#[derive(Debug, Error)]
pub enum VouchError {
    /// An argument was empty or otherwise unusable.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// The operation was cancelled by the caller.
    #[error("Verification cancelled")]
    Cancelled,

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VouchError {
    /// Build an [`VouchError::InvalidArgument`] for an empty value.
    pub fn empty_argument(name: &str) -> Self {
        Self::InvalidArgument {
            name: name.to_string(),
            message: "must not be empty".to_string(),
        }
    }

    /// Whether this error represents a caller-requested cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for Vouch operations.
pub type Result<T> = std::result::Result<T, VouchError>;
