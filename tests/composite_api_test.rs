//! Integration tests for the composite verifier through the public API.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use vouch::verification::{
    CancellationSignal, CancellationSource, CompositeVerifier, GuardedStrategy, Probe, ProbeError,
    RetryPolicy, Sleeper, StrategyError, VerificationOutcome, VerificationRequest,
    VerificationStrategy, COMPOSITE_METHOD,
};
use vouch::VouchError;

/// Records requested delays and returns immediately.
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

/// A registry-like probe that starts reporting the package after N checks.
struct SettlingProbe {
    checks: AtomicU32,
    ready_after: u32,
    installed: &'static str,
}

#[async_trait]
impl Probe for SettlingProbe {
    async fn check_presence(
        &self,
        strategy: &str,
        _package_id: &str,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        let n = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if n >= self.ready_after {
            Ok(VerificationOutcome::verified(strategy).with_installed_version(self.installed))
        } else {
            Ok(VerificationOutcome::failed(strategy, "uninstall key not written yet"))
        }
    }

    async fn check_version(
        &self,
        strategy: &str,
        _package_id: &str,
        version: &str,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        if self.installed == version {
            Ok(VerificationOutcome::verified(strategy).with_installed_version(self.installed))
        } else {
            Ok(VerificationOutcome::not_verified(strategy).with_installed_version(self.installed))
        }
    }
}

/// A probe whose backing tool is broken.
struct BrokenProbe;

#[async_trait]
impl Probe for BrokenProbe {
    async fn check_presence(
        &self,
        _strategy: &str,
        _package_id: &str,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        Err(ProbeError::Failed(anyhow::anyhow!("package database locked")))
    }

    async fn check_version(
        &self,
        _strategy: &str,
        _package_id: &str,
        _version: &str,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, ProbeError> {
        Err(ProbeError::Failed(anyhow::anyhow!("package database locked")))
    }
}

/// A strategy that always gives the same answer.
struct Fixed {
    name: &'static str,
    priority: i32,
    outcome: VerificationOutcome,
}

#[async_trait]
impl VerificationStrategy for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn verify(
        &self,
        _request: &VerificationRequest,
        _cancel: &CancellationSignal,
    ) -> Result<VerificationOutcome, StrategyError> {
        Ok(self.outcome.clone())
    }
}

fn fixed(name: &'static str, priority: i32, outcome: VerificationOutcome) -> Arc<dyn VerificationStrategy> {
    Arc::new(Fixed {
        name,
        priority,
        outcome,
    })
}

fn settling(name: &str, priority: i32, ready_after: u32, installed: &'static str) -> Arc<dyn VerificationStrategy> {
    Arc::new(
        GuardedStrategy::new(
            name,
            priority,
            SettlingProbe {
                checks: AtomicU32::new(0),
                ready_after,
                installed,
            },
        )
        .unwrap(),
    )
}

fn broken(name: &str, priority: i32) -> Arc<dyn VerificationStrategy> {
    Arc::new(GuardedStrategy::new(name, priority, BrokenProbe).unwrap())
}

#[tokio::test]
async fn registry_settles_on_third_attempt() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let verifier = CompositeVerifier::new(vec![
        settling("PackageManager", 2, u32::MAX, "1.0"),
        settling("Registry", 1, 3, "2.0"),
    ])
    .with_sleeper(sleeper.clone());

    let outcome = verifier
        .verify_presence("App.Id", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(outcome.verified);
    assert_eq!(outcome.method, "Registry");
    assert_eq!(
        *sleeper.delays.lock().unwrap(),
        vec![
            Duration::from_secs(2),
            Duration::from_secs(1),
            Duration::from_secs(2)
        ]
    );
}

#[tokio::test]
async fn exhausted_presence_reports_last_attempt() {
    let verifier = CompositeVerifier::new(vec![
        settling("Registry", 1, u32::MAX, "1.0"),
        broken("PackageManager", 2),
    ])
    .with_sleeper(Arc::new(RecordingSleeper::default()));

    let outcome = verifier
        .verify_presence("App.Id", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.method, COMPOSITE_METHOD);
    assert_eq!(
        outcome.message.as_deref(),
        Some(
            "uninstall key not written yet; \
             Error during verification using PackageManager: package database locked"
        )
    );
    let diagnostics = outcome.diagnostics.unwrap();
    assert_eq!(diagnostics.package_id, "App.Id");
    assert_eq!(diagnostics.outcomes.len(), 2);
}

#[tokio::test]
async fn version_mismatch_names_reporting_strategy() {
    let verifier = CompositeVerifier::new(vec![
        broken("Registry", 1),
        settling("PackageManager", 2, 1, "1.0"),
    ]);

    let outcome = verifier
        .verify_version("App.Id", "2.0", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.method, "PackageManager");
    assert_eq!(
        outcome.message.as_deref(),
        Some("Version mismatch for 'App.Id'. Installed: 1.0, Expected: 2.0")
    );
    assert_eq!(outcome.installed_version.as_deref(), Some("1.0"));
}

#[tokio::test]
async fn verified_strategy_reporting_older_version_is_a_mismatch() {
    let verifier = CompositeVerifier::new(vec![
        fixed(
            "PackageManager",
            2,
            VerificationOutcome::verified("PackageManager").with_installed_version("1.0"),
        ),
        fixed("Registry", 1, VerificationOutcome::not_verified("Registry")),
    ]);

    let outcome = verifier
        .verify_version("App.Id", "2.0", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.method, "PackageManager");
    assert_eq!(
        outcome.message.as_deref(),
        Some("Version mismatch for 'App.Id'. Installed: 1.0, Expected: 2.0")
    );
}

#[tokio::test]
async fn lower_priority_exact_match_wins_over_verified_mismatch() {
    let verifier = CompositeVerifier::new(vec![
        fixed(
            "Registry",
            1,
            VerificationOutcome::verified("Registry").with_installed_version("1.0"),
        ),
        fixed(
            "PackageManager",
            2,
            VerificationOutcome::verified("PackageManager").with_installed_version("2.0"),
        ),
    ]);

    let outcome = verifier
        .verify_version("App.Id", "2.0", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(outcome.verified);
    assert_eq!(outcome.method, "PackageManager");
    assert_eq!(outcome.installed_version.as_deref(), Some("2.0"));
}

#[tokio::test]
async fn version_match_is_verified_without_sleeping() {
    let sleeper = Arc::new(RecordingSleeper::default());
    let verifier = CompositeVerifier::new(vec![settling("PackageManager", 2, 1, "2.0")])
        .with_sleeper(sleeper.clone());

    let outcome = verifier
        .verify_version("App.Id", "2.0", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(outcome.verified);
    assert!(sleeper.delays.lock().unwrap().is_empty());
}

#[tokio::test]
async fn empty_verifier_fails_gracefully() {
    let verifier = CompositeVerifier::new(Vec::new())
        .with_sleeper(Arc::new(RecordingSleeper::default()));

    let outcome = verifier
        .verify_presence("App.Id", &CancellationSignal::never())
        .await
        .unwrap();

    assert!(!outcome.verified);
    assert_eq!(outcome.method, COMPOSITE_METHOD);
    assert!(outcome.diagnostics.unwrap().outcomes.is_empty());
}

#[tokio::test]
async fn empty_package_id_is_rejected() {
    let verifier = CompositeVerifier::new(Vec::new());
    let result = verifier
        .verify_presence("", &CancellationSignal::never())
        .await;
    assert!(matches!(result, Err(VouchError::InvalidArgument { .. })));
}

#[tokio::test]
async fn guarded_strategy_rejects_empty_package_id() {
    let strategy = settling("Registry", 1, 1, "1.0");
    let result = strategy
        .verify(&VerificationRequest::presence(""), &CancellationSignal::never())
        .await;
    assert!(result.is_err());
}

#[tokio::test(start_paused = true)]
async fn deadline_cancels_during_backoff() {
    let verifier = CompositeVerifier::new(vec![settling("Registry", 1, u32::MAX, "1.0")])
        .with_policy(RetryPolicy::default());

    let source = CancellationSource::new();
    let signal = source.signal();
    source.cancel_after(Duration::from_millis(2500));

    let result = verifier.verify_presence("App.Id", &signal).await;
    assert!(matches!(result, Err(VouchError::Cancelled)));
}
