use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serverstatus::{Probe, Reachability, Target};
use tokio::time::timeout;

use crate::notify::Notifier;

/// Bound on a single alert dispatch so a hung transport cannot stall the
/// tick loop
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracks consecutive probe failures and dispatches an alert once the
/// configured tolerance is exceeded.
///
/// A limit of `N` tolerates `N` consecutive failures; the `(N+1)`th sends
/// the alert and resets the counter. The counter also resets on every
/// success, so an outage that outlives the limit re-alerts every `N + 1`
/// failed checks. That repetition is deliberate: there is no
/// recovery-suppression state.
pub struct StatusMonitor {
    target: Target,
    threshold: u32,
    prober: Arc<dyn Probe>,
    notifier: Arc<dyn Notifier>,
    log_file: PathBuf,
    consecutive_failures: u32,
}

impl StatusMonitor {
    pub fn new(
        target: Target,
        threshold: u32,
        prober: Arc<dyn Probe>,
        notifier: Arc<dyn Notifier>,
        log_file: PathBuf,
    ) -> Self {
        Self { target, threshold, prober, notifier, log_file, consecutive_failures: 0 }
    }

    /// One check cycle; invoked once per scheduler tick
    pub async fn check(&mut self) {
        match self.prober.probe(&self.target).await {
            Reachability::Reachable => {
                tracing::info!("{} is running", self.target);
                self.consecutive_failures = 0;
            }
            Reachability::Unreachable => {
                tracing::error!("{} is not running", self.target);
                if self.consecutive_failures < self.threshold {
                    self.consecutive_failures += 1;
                } else {
                    // Reset before dispatching: the alert counts as
                    // attempted even if the transport fails, and the next
                    // failure starts a fresh countdown.
                    self.consecutive_failures = 0;
                    self.dispatch_alert().await;
                }
            }
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    async fn dispatch_alert(&self) {
        let message = format!("{} is not running.", self.target);
        let attachments = [self.log_file.clone()];

        match timeout(NOTIFY_TIMEOUT, self.notifier.notify(&self.target, &message, &attachments))
            .await
        {
            Ok(Ok(())) => tracing::info!("alert dispatched for {}", self.target),
            Ok(Err(error)) => tracing::error!(%error, "alert dispatch failed"),
            Err(_) => tracing::error!(
                timeout_secs = NOTIFY_TIMEOUT.as_secs(),
                "alert dispatch timed out"
            ),
        }
    }
}
