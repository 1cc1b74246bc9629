//! Cache Reaper Task
//!
//! Background task that periodically removes outdated cache entries.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

// == Sweep Report ==
/// Outcome of one sweep over the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Entries deleted by this sweep
    pub removed: usize,
    /// Entries left in the store afterwards
    pub remaining: usize,
}

// == Sweep Observer ==
/// Receives a report after every sweep, whether periodic or manual.
pub trait SweepObserver: Send + Sync {
    fn on_sweep(&self, report: SweepReport);
}

/// Default observer: reports sweeps through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn on_sweep(&self, report: SweepReport) {
        if report.removed > 0 {
            info!(
                removed = report.removed,
                remaining = report.remaining,
                "Cache cleanup removed outdated entries"
            );
        } else {
            debug!(remaining = report.remaining, "Cache cleanup: no outdated entries");
        }
    }
}

// == Sweep ==
/// Reaps `store` once and notifies `observer`.
///
/// The lock is released before the observer runs.
pub fn sweep(store: &Mutex<CacheStore>, observer: &dyn SweepObserver) -> SweepReport {
    let report = {
        let mut guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        let removed = guard.reap(Instant::now());
        SweepReport {
            removed,
            remaining: guard.len(),
        }
    };
    observer.on_sweep(report);
    report
}

/// Spawns the reaper loop for `store` on `runtime`.
///
/// The loop sweeps once per `interval`, first tick one interval after start.
/// It ends when `shutdown` fires or its sender is dropped. A sweep that panics
/// is logged and retried on the next tick.
///
/// # Example
/// ```ignore
/// let (stop_tx, stop_rx) = oneshot::channel();
/// let task = spawn_reaper(&Handle::current(), store, interval, Arc::new(LogObserver), stop_rx);
/// // Later:
/// let _ = stop_tx.send(());
/// task.await?;
/// ```
pub fn spawn_reaper(
    runtime: &Handle,
    store: Arc<Mutex<CacheStore>>,
    interval: Duration,
    observer: Arc<dyn SweepObserver>,
    mut shutdown: oneshot::Receiver<()>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        info!(
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "Starting cache reaper"
        );

        // Callers reject intervals whose first two ticks overflow `Instant`
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                stop = &mut shutdown => {
                    match stop {
                        Ok(()) => info!("Cache reaper stopped"),
                        Err(_) => debug!("Cache dropped, stopping reaper"),
                    }
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Cleaning up cache");
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                        sweep(&store, observer.as_ref())
                    }));
                    if outcome.is_err() {
                        warn!("Cache sweep panicked, retrying on next tick");
                    }
                }
            }
        }
    })
}

// == Reaper Handle ==
/// Owns the stop signal and join handle of a running reaper.
///
/// Dropping it closes the stop channel, which ends the task.
#[derive(Debug)]
pub struct ReaperHandle {
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl ReaperHandle {
    /// Wraps the stop sender and join handle returned by [`spawn_reaper`].
    pub fn new(shutdown: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            shutdown: Mutex::new(Some(shutdown)),
            task: Mutex::new(Some(task)),
        }
    }

    /// True until the task has finished.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Signals the task to stop and waits for it. Later calls return immediately.
    pub async fn stop(&self) {
        let shutdown = self
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(shutdown) = shutdown {
            // Err means the task already exited
            let _ = shutdown.send(());
        }

        let task = self.task.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "Cache reaper ended abnormally");
            }
        }
    }
}
