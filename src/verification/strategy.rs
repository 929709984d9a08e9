//! Strategy trait and strategy error types.

use async_trait::async_trait;
use thiserror::Error;

use super::cancel::CancellationSignal;
use super::outcome::VerificationOutcome;
use super::request::VerificationRequest;

/// One independent mechanism for detecting whether a package is installed.
///
/// Implementations must be stateless across calls so a single instance can
/// serve concurrent verifications.
#[async_trait]
pub trait VerificationStrategy: Send + Sync {
    /// Stable, non-empty identity of this strategy.
    fn name(&self) -> &str;

    /// Evaluation priority. Lower values run first.
    fn priority(&self) -> i32;

    /// Answer a verification request.
    ///
    /// Returns `Err(StrategyError::Cancelled)` if `cancel` fired while the
    /// strategy was working.
    async fn verify(
        &self,
        request: &VerificationRequest,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, StrategyError>;
}

/// Errors a strategy may return instead of an outcome.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// The caller cancelled the verification.
    #[error("Verification cancelled")]
    Cancelled,

    /// The request was malformed.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    /// The strategy broke outside its outcome contract.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Errors a [`Probe`](super::guard::Probe) may raise.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The caller cancelled the verification.
    #[error("Verification cancelled")]
    Cancelled,

    /// Anything else. Converted into a failed outcome by the guard.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<std::io::Error> for ProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::Failed(err.into())
    }
}
