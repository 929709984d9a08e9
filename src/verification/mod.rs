//! Installation verification engine.
//!
//! Right after an install or uninstall, no single detection mechanism can
//! be trusted: package catalogs, registries and the filesystem catch up at
//! different speeds. This module combines several strategies into one
//! answer.
//!
//! # Modules
//!
//! - [`outcome`] - Result records produced by strategies and the verifier
//! - [`request`] - Presence vs. exact-version requests
//! - [`strategy`] - The [`VerificationStrategy`] trait and its errors
//! - [`guard`] - [`Probe`] + [`GuardedStrategy`], the shared strategy skeleton
//! - [`cancel`] - Cooperative cancellation
//! - [`delay`] - Retry policy and cancellable waits
//! - [`version`] - Version extraction and comparison
//! - [`composite`] - The [`CompositeVerifier`] orchestrator
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use vouch::verification::{
//!     CancellationSignal, CompositeVerifier, RetryPolicy, VerificationStrategy,
//! };
//!
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! rt.block_on(async {
//!     let strategies: Vec<Arc<dyn VerificationStrategy>> = Vec::new();
//!     let verifier = CompositeVerifier::new(strategies).with_policy(RetryPolicy::immediate(1));
//!     let outcome = verifier
//!         .verify_presence("App.Id", &CancellationSignal::never())
//!         .await
//!         .unwrap();
//!     assert!(!outcome.verified);
//!     assert_eq!(outcome.method, "Composite");
//! });
//! ```

pub mod cancel;
pub mod composite;
pub mod delay;
pub mod guard;
pub mod outcome;
pub mod request;
pub mod strategy;
pub mod version;

pub use cancel::{CancellationSignal, CancellationSource};
pub use composite::CompositeVerifier;
pub use delay::{cancellable_sleep, RetryPolicy, Sleeper, TokioSleeper, Wait};
pub use guard::{GuardedStrategy, Probe};
pub use outcome::{CompositeDiagnostics, VerificationOutcome, COMPOSITE_METHOD};
pub use request::VerificationRequest;
pub use strategy::{ProbeError, StrategyError, VerificationStrategy};
