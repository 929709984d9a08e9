//! Vouch - Post-install package verification.
//!
//! Vouch answers two questions after an installer has run: is the package
//! actually present, and is it present at the version that was asked for?
//! Several detection strategies are tried in priority order; presence checks
//! retry with backoff to ride out installers that finish asynchronously.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`strategies`] - Command, file, and PATH based detection
//! - [`ui`] - Terminal output
//! - [`verification`] - Outcomes, the strategy contract, and the composite verifier
//!
//! # Example
//!
//! ```
//! use vouch::config::parse_config;
//! use vouch::strategies::build_verifier;
//! use std::path::Path;
//!
//! let config = parse_config(
//!     "strategies:\n  - name: Markers\n    type: file\n    paths: [\"/opt/{package}\"]\n",
//!     Path::new("inline.yml"),
//! )
//! .unwrap();
//! let verifier = build_verifier(&config).unwrap();
//! assert_eq!(verifier.strategy_names(), vec!["Markers"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod strategies;
pub mod ui;
pub mod verification;

pub use error::{Result, VouchError};
