//! Retry timing.
//!
//! The composite verifier never sleeps directly; it goes through a
//! [`Sleeper`] so tests can substitute an instant one and inspect the
//! requested delays.

use std::time::Duration;

use async_trait::async_trait;

use super::cancel::CancellationSignal;

/// Suspends the current verification for a while.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Outcome of a cancellable wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// The full duration elapsed.
    Elapsed,
    /// Cancellation fired first.
    Cancelled,
}

/// Sleep for `duration` unless `cancel` fires first.
///
/// An already-cancelled signal wins even over a zero-length wait.
pub async fn cancellable_sleep(
    sleeper: &dyn Sleeper,
    duration: Duration,
    cancel: &CancellationSignal,
) -> Wait {
    if cancel.is_cancelled() {
        return Wait::Cancelled;
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Wait::Cancelled,
        _ = sleeper.sleep(duration) => Wait::Elapsed,
    }
}

/// Warm-up, attempt count and backoff schedule for presence checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait before the first attempt.
    pub warm_up: Duration,
    /// Total number of attempts. Always at least one.
    pub max_attempts: u32,
    /// Backoff unit; attempt `n` is followed by `n * backoff_step`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            warm_up: Duration::from_secs(2),
            max_attempts: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits, for callers that already waited.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            warm_up: Duration::ZERO,
            max_attempts: max_attempts.max(1),
            backoff_step: Duration::ZERO,
        }
    }

    /// Delay after a failed `attempt` (1-based), or `None` after the last.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        Some(self.backoff_step * attempt)
    }

    /// Total mandated sleep when every attempt fails.
    pub fn worst_case_delay(&self) -> Duration {
        (1..self.max_attempts)
            .filter_map(|attempt| self.backoff_after(attempt))
            .fold(self.warm_up, |acc, d| acc + d)
    }
}
