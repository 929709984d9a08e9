//! Shared strategy skeleton.
//!
//! Concrete detection mechanisms implement [`Probe`], which only has to
//! answer the two questions (is it present, is it this version) and may fail
//! freely. [`GuardedStrategy`] wraps a probe into a [`VerificationStrategy`]
//! that:
//!
//! - rejects empty package ids before the probe runs,
//! - dispatches on the request kind,
//! - turns any probe failure into a failed outcome,
//! - lets cancellation through untouched.

use async_trait::async_trait;

use crate::error::{Result, VouchError};

use super::cancel::CancellationSignal;
use super::outcome::VerificationOutcome;
use super::request::VerificationRequest;
use super::strategy::{ProbeError, StrategyError, VerificationStrategy};

/// The detection logic of a strategy.
///
/// `package_id` is never empty when called through [`GuardedStrategy`],
/// and the guard overwrites `method` on returned outcomes with its own name.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Check whether the package is present at any version.
    async fn check_presence(
        &self,
        strategy: &str,
        package_id: &str,
        cancel: &CancellationSignal,
    ) -> std::result::Result<VerificationOutcome, ProbeError>;

    /// Check whether the package is present at exactly `version`.
    async fn check_version(
        &self,
        strategy: &str,
        package_id: &str,
        version: &str,
        cancel: &CancellationSignal,
    ) -> std::result::Result<VerificationOutcome, ProbeError>;
}

/// A [`Probe`] with a name, a priority and uniform error handling.
#[derive(Debug)]
pub struct GuardedStrategy<P> {
    name: String,
    priority: i32,
    probe: P,
}

impl<P: Probe> GuardedStrategy<P> {
    /// Wrap `probe`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `name` is empty.
    pub fn new(name: &str, priority: i32, probe: P) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(VouchError::empty_argument("name"));
        }
        Ok(Self {
            name: name.to_string(),
            priority,
            probe,
        })
    }

    /// The wrapped probe.
    pub fn probe(&self) -> &P {
        &self.probe
    }
}

#[async_trait]
impl<P: Probe> VerificationStrategy for GuardedStrategy<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn verify(
        &self,
        request: &VerificationRequest,
        cancel: &CancellationSignal,
    ) -> std::result::Result<VerificationOutcome, StrategyError> {
        let package_id = request.package_id();
        if package_id.trim().is_empty() {
            return Err(StrategyError::InvalidArgument {
                name: "package_id".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        let result = match request {
            VerificationRequest::Presence { .. } => {
                self.probe
                    .check_presence(&self.name, package_id, cancel)
                    .await
            }
            VerificationRequest::Version { version, .. } => {
                self.probe
                    .check_version(&self.name, package_id, version, cancel)
                    .await
            }
        };

        match result {
            Ok(mut outcome) => {
                outcome.method = self.name.clone();
                Ok(outcome)
            }
            Err(ProbeError::Cancelled) => Err(StrategyError::Cancelled),
            Err(ProbeError::Failed(err)) => {
                tracing::debug!(strategy = %self.name, error = %err, "Probe failed");
                Ok(VerificationOutcome::failed(
                    &self.name,
                    format!("Error during verification using {}: {}", self.name, err),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingProbe {
        presence_calls: AtomicUsize,
        version_calls: AtomicUsize,
        fail_with: Option<&'static str>,
        cancel: bool,
        report_as: Option<&'static str>,
    }

    impl CountingProbe {
        fn result(&self, strategy: &str) -> std::result::Result<VerificationOutcome, ProbeError> {
            if self.cancel {
                return Err(ProbeError::Cancelled);
            }
            if let Some(msg) = self.fail_with {
                return Err(anyhow::anyhow!(msg).into());
            }
            Ok(VerificationOutcome::verified(self.report_as.unwrap_or(strategy)))
        }
    }

    #[async_trait]
    impl Probe for CountingProbe {
        async fn check_presence(
            &self,
            strategy: &str,
            _package_id: &str,
            _cancel: &CancellationSignal,
        ) -> std::result::Result<VerificationOutcome, ProbeError> {
            self.presence_calls.fetch_add(1, Ordering::SeqCst);
            self.result(strategy)
        }

        async fn check_version(
            &self,
            strategy: &str,
            _package_id: &str,
            _version: &str,
            _cancel: &CancellationSignal,
        ) -> std::result::Result<VerificationOutcome, ProbeError> {
            self.version_calls.fetch_add(1, Ordering::SeqCst);
            self.result(strategy)
        }
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = GuardedStrategy::new("  ", 1, CountingProbe::default()).unwrap_err();
        assert!(matches!(err, VouchError::InvalidArgument { .. }));
    }

    #[test]
    fn exposes_name_and_priority() {
        let strategy = GuardedStrategy::new("Registry", 7, CountingProbe::default()).unwrap();
        assert_eq!(strategy.name(), "Registry");
        assert_eq!(strategy.priority(), 7);
    }

    #[tokio::test]
    async fn presence_request_dispatches_to_presence_check() {
        let strategy = GuardedStrategy::new("Registry", 1, CountingProbe::default()).unwrap();
        let outcome = strategy
            .verify(
                &VerificationRequest::presence("App.Id"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert!(outcome.verified);
        assert_eq!(strategy.probe().presence_calls.load(Ordering::SeqCst), 1);
        assert_eq!(strategy.probe().version_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn version_request_dispatches_to_version_check() {
        let strategy = GuardedStrategy::new("Registry", 1, CountingProbe::default()).unwrap();
        strategy
            .verify(
                &VerificationRequest::version("App.Id", "2.0"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert_eq!(strategy.probe().presence_calls.load(Ordering::SeqCst), 0);
        assert_eq!(strategy.probe().version_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_package_id_never_reaches_probe() {
        let strategy = GuardedStrategy::new("Registry", 1, CountingProbe::default()).unwrap();
        let err = strategy
            .verify(
                &VerificationRequest::presence(""),
                &CancellationSignal::never(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StrategyError::InvalidArgument { .. }));
        assert_eq!(strategy.probe().presence_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn probe_failure_becomes_failed_outcome() {
        let probe = CountingProbe {
            fail_with: Some("access denied"),
            ..Default::default()
        };
        let strategy = GuardedStrategy::new("Registry", 1, probe).unwrap();
        let outcome = strategy
            .verify(
                &VerificationRequest::presence("App.Id"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap();

        assert!(!outcome.verified);
        assert_eq!(outcome.method, "Registry");
        assert_eq!(
            outcome.message.as_deref(),
            Some("Error during verification using Registry: access denied")
        );
    }

    #[tokio::test]
    async fn cancellation_is_propagated() {
        let probe = CountingProbe {
            cancel: true,
            ..Default::default()
        };
        let strategy = GuardedStrategy::new("Registry", 1, probe).unwrap();
        let err = strategy
            .verify(
                &VerificationRequest::presence("App.Id"),
                &CancellationSignal::never(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StrategyError::Cancelled));
    }

    #[tokio::test]
    async fn outcome_method_is_the_strategy_name() {
        let probe = CountingProbe {
            report_as: Some("SomethingElse"),
            ..Default::default()
        };
        let strategy = GuardedStrategy::new("Registry", 1, probe).unwrap();

        let outcome = strategy
            .verify(&VerificationRequest::presence("App.Id"), &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(outcome.method, "Registry");
    }
}
