//! Cooperative cancellation.
//!
//! A [`CancellationSource`] owns the trigger; any number of
//! [`CancellationSignal`]s observe it. The signal is threaded through every
//! wait and every strategy call so cancellation can interrupt a verification
//! at any suspension point.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// The owning side of a cancellation channel.
///
/// Clones share the same trigger.
#[derive(Debug, Clone)]
pub struct CancellationSource {
    tx: Arc<watch::Sender<bool>>,
}

/// A cheap, cloneable view of a [`CancellationSource`].
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    rx: watch::Receiver<bool>,
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSource {
    /// Create a new, untriggered source.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Obtain a signal observing this source.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Cancel automatically once `after` has elapsed.
    ///
    /// Must be called from within a Tokio runtime, after the signals that
    /// should observe the deadline have been handed out. The timer task ends
    /// early once every signal has been dropped.
    pub fn cancel_after(&self, after: Duration) {
        let tx = Arc::clone(&self.tx);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => {
                    tracing::debug!(?after, "Deadline reached, cancelling");
                    tx.send_replace(true);
                }
                _ = tx.closed() => {}
            }
        });
    }

    /// Cancel when the process receives Ctrl-C.
    ///
    /// Same runtime requirements as [`cancel_after`](Self::cancel_after).
    pub fn cancel_on_ctrl_c(&self) {
        let tx = Arc::clone(&self.tx);
        tokio::spawn(async move {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => {
                            tracing::debug!("Interrupted, cancelling");
                            tx.send_replace(true);
                        }
                        Err(e) => tracing::warn!("Unable to listen for Ctrl-C: {}", e),
                    }
                }
                _ = tx.closed() => {}
            }
        });
    }
}

impl CancellationSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is requested.
    ///
    /// Pends forever if the source is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
