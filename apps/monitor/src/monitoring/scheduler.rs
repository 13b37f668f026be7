use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

/// Repeating tick driver with non-overlapping ticks.
///
/// One background task sleeps for the interval, runs the tick to completion,
/// then re-arms. The effective period is therefore the interval plus the
/// tick's own execution time, not a fixed rate.
pub struct Scheduler<F> {
    interval: Duration,
    tick: Arc<F>,
    active: Mutex<Option<Active>>,
}

struct Active {
    cancel: watch::Sender<bool>,
    _handle: JoinHandle<()>,
}

impl<F, Fut> Scheduler<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    /// Runs the tick function once per interval after `start()` is called
    pub fn new(interval: Duration, tick: F) -> Self {
        Self { interval, tick: Arc::new(tick), active: Mutex::new(None) }
    }

    /// Arm the repeating timer. No-op while already running.
    pub fn start(&self) {
        let mut active = self.active.lock().expect("scheduler state poisoned");
        if active.is_some() {
            // Don't start if we're running
            return;
        }

        let (cancel, mut cancelled) = watch::channel(false);
        let tick = Arc::clone(&self.tick);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            loop {
                // The cancel signal is consulted right before every re-arm,
                // so stop() prevents future ticks but an already-fired tick
                // still runs to completion.
                tokio::select! {
                    _ = time::sleep(interval) => {}
                    _ = cancelled.changed() => break,
                }
                tick().await;
            }
        });

        *active = Some(Active { cancel, _handle: handle });
    }

    /// Cancel the repeating timer. Best-effort: a tick whose sleep already
    /// elapsed completes before the loop exits. Idempotent and safe to call
    /// when never started.
    pub fn stop(&self) {
        if let Some(active) = self.active.lock().expect("scheduler state poisoned").take() {
            let _ = active.cancel.send(true);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.lock().expect("scheduler state poisoned").is_some()
    }
}
