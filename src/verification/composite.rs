//! Composite verifier.
//!
//! Combines an ordered set of strategies into one answer. System state is
//! registered asynchronously after an install or uninstall completes, so a
//! single negative answer is not trusted: presence checks wait, retry with
//! backoff and accept the first strategy that confirms.

use std::sync::Arc;

use crate::error::{Result, VouchError};

use super::cancel::CancellationSignal;
use super::delay::{cancellable_sleep, RetryPolicy, Sleeper, TokioSleeper, Wait};
use super::outcome::{
    join_failure_messages, CompositeDiagnostics, VerificationOutcome, COMPOSITE_METHOD,
};
use super::request::VerificationRequest;
use super::strategy::{StrategyError, VerificationStrategy};
use super::version::versions_match;

/// Orchestrates strategies for presence and exact-version checks.
pub struct CompositeVerifier {
    strategies: Vec<Arc<dyn VerificationStrategy>>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for CompositeVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeVerifier")
            .field("strategies", &self.strategy_names())
            .field("policy", &self.policy)
            .finish()
    }
}

impl CompositeVerifier {
    /// Create a verifier over `strategies`.
    ///
    /// Strategies are sorted by ascending priority; equal priorities keep
    /// their given order. An empty set is allowed and simply never verifies.
    pub fn new(mut strategies: Vec<Arc<dyn VerificationStrategy>>) -> Self {
        // `sort_by_key` is stable.
        strategies.sort_by_key(|s| s.priority());
        Self {
            strategies,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = RetryPolicy {
            max_attempts: policy.max_attempts.max(1),
            ..policy
        };
        self
    }

    /// Replace the sleeper used for warm-up and backoff waits.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Strategies in evaluation order.
    pub fn strategies(&self) -> &[Arc<dyn VerificationStrategy>] {
        &self.strategies
    }

    /// Strategy names in evaluation order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// The active retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Verify that `package_id` is installed at any version.
    ///
    /// Waits for the warm-up delay, then makes up to `max_attempts` passes
    /// over the strategies. The first verified outcome is returned as soon as
    /// it is seen. When every attempt fails, a `"Composite"` outcome carrying
    /// the last attempt's messages and outcomes is returned.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty package id, `Cancelled` if `cancel`
    /// fires at any point.
    pub async fn verify_presence(
        &self,
        package_id: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome> {
        require_non_empty("package_id", package_id)?;
        let request = VerificationRequest::presence(package_id);

        tracing::debug!(package = package_id, warm_up = ?self.policy.warm_up, "Warming up");
        self.wait(self.policy.warm_up, cancel).await?;

        let mut outcomes = Vec::new();
        for attempt in 1..=self.policy.max_attempts {
            outcomes.clear();
            tracing::debug!(package = package_id, attempt, "Starting verification attempt");

            for strategy in &self.strategies {
                let outcome = self.run_strategy(strategy.as_ref(), &request, cancel).await?;
                if outcome.verified {
                    tracing::info!(
                        package = package_id,
                        strategy = strategy.name(),
                        attempt,
                        "Installation verified"
                    );
                    return Ok(outcome);
                }
                outcomes.push(outcome);
            }

            if let Some(backoff) = self.policy.backoff_after(attempt) {
                tracing::debug!(package = package_id, attempt, ?backoff, "Not verified, backing off");
                self.wait(backoff, cancel).await?;
            }
        }

        let joined = join_failure_messages(&outcomes);
        let message = if joined.is_empty() {
            format!("Unable to verify installation of '{}'", package_id)
        } else {
            joined
        };
        tracing::warn!(
            package = package_id,
            attempts = self.policy.max_attempts,
            "Installation could not be verified"
        );

        Ok(
            VerificationOutcome::failed(COMPOSITE_METHOD, message).with_diagnostics(
                CompositeDiagnostics {
                    package_id: package_id.to_string(),
                    version: None,
                    outcomes,
                },
            ),
        )
    }

    /// Verify that `package_id` is installed at exactly `version`.
    ///
    /// Runs every strategy once, in order, without warm-up or retries. The
    /// first verified outcome whose installed version is absent or matches
    /// wins. Otherwise the first strategy that reported a different installed
    /// version, verified or not, yields a mismatch outcome; failing that, a
    /// `"Composite"` aggregate failure is returned.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty package id or version, `Cancelled` if
    /// `cancel` fires at any point.
    pub async fn verify_version(
        &self,
        package_id: &str,
        version: &str,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome> {
        require_non_empty("package_id", package_id)?;
        require_non_empty("version", version)?;
        let request = VerificationRequest::version(package_id, version);

        let mut outcomes = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            let outcome = self.run_strategy(strategy.as_ref(), &request, cancel).await?;
            outcomes.push(outcome);
        }

        let reports_other_version = |o: &VerificationOutcome| {
            o.installed_version
                .as_deref()
                .is_some_and(|installed| !versions_match(installed, version))
        };

        if let Some(verified) = outcomes
            .iter()
            .find(|o| o.verified && !reports_other_version(*o))
        {
            tracing::info!(
                package = package_id,
                version,
                strategy = %verified.method,
                "Version verified"
            );
            return Ok(verified.clone());
        }

        let mismatch = outcomes.iter().find(|o| reports_other_version(*o));
        if let Some(found) = mismatch {
            let installed = found.installed_version.as_deref().unwrap_or("unknown");
            tracing::warn!(
                package = package_id,
                installed,
                expected = version,
                strategy = %found.method,
                "Version mismatch"
            );
            return Ok(VerificationOutcome::failed(
                &found.method,
                format!(
                    "Version mismatch for '{}'. Installed: {}, Expected: {}",
                    package_id, installed, version
                ),
            )
            .with_installed_version(installed));
        }

        let joined = join_failure_messages(&outcomes);
        let message = if joined.is_empty() {
            format!("Version {} of '{}' could not be verified", version, package_id)
        } else {
            format!(
                "Version {} of '{}' could not be verified: {}",
                version, package_id, joined
            )
        };
        tracing::warn!(package = package_id, version, "Version could not be verified");

        Ok(
            VerificationOutcome::failed(COMPOSITE_METHOD, message).with_diagnostics(
                CompositeDiagnostics {
                    package_id: package_id.to_string(),
                    version: Some(version.to_string()),
                    outcomes,
                },
            ),
        )
    }

    /// Run one strategy, absorbing everything except cancellation.
    async fn run_strategy(
        &self,
        strategy: &dyn VerificationStrategy,
        request: &VerificationRequest,
        cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome> {
        if cancel.is_cancelled() {
            return Err(VouchError::Cancelled);
        }

        tracing::debug!(strategy = strategy.name(), package = request.package_id(), "Running strategy");
        match strategy.verify(request, cancel).await {
            Ok(outcome) => Ok(outcome),
            Err(StrategyError::Cancelled) => Err(VouchError::Cancelled),
            Err(err) => {
                tracing::debug!(strategy = strategy.name(), error = %err, "Strategy errored");
                Ok(VerificationOutcome::failed(
                    strategy.name(),
                    format!("Error in {}: {}", strategy.name(), err),
                ))
            }
        }
    }

    async fn wait(&self, duration: std::time::Duration, cancel: &CancellationSignal) -> Result<()> {
        match cancellable_sleep(self.sleeper.as_ref(), duration, cancel).await {
            Wait::Elapsed => Ok(()),
            Wait::Cancelled => Err(VouchError::Cancelled),
        }
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VouchError::empty_argument(name));
    }
    Ok(())
}
