//! Cache Handle Module
//!
//! The shared, thread-safe entry point to a time-expiring cache and its reaper.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, CacheResult};
use crate::tasks::{spawn_reaper, sweep, LogObserver, ReaperHandle, SweepObserver, SweepReport};

// == Cache ==
/// Time-expiring byte cache.
///
/// Cloning is cheap and every clone shares the same entries and reaper. The
/// reaper removes entries older than the interval once per interval; lookups
/// never check age themselves, so an outdated entry stays visible until the
/// next sweep. The reaper stops on [`Cache::shutdown`] or when the last clone
/// is dropped.
///
/// # Example
/// ```ignore
/// let cache = Cache::new(Duration::from_secs(60))?;
/// cache.add("https://pokeapi.co/api/v2/pokemon/pikachu", body)?;
/// if let Some(bytes) = cache.get("https://pokeapi.co/api/v2/pokemon/pikachu")? {
///     // use cached bytes
/// }
/// cache.shutdown().await;
/// ```
#[derive(Clone)]
pub struct Cache {
    store: Arc<Mutex<CacheStore>>,
    interval: Duration,
    observer: Arc<dyn SweepObserver>,
    reaper: Arc<ReaperHandle>,
}

impl Cache {
    // == Constructor ==
    /// Creates an empty cache and starts its reaper, logging each sweep.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(interval: Duration) -> CacheResult<Self> {
        Self::with_observer(interval, Arc::new(LogObserver))
    }

    /// Creates an empty cache whose sweeps are reported to `observer`.
    pub fn with_observer(
        interval: Duration,
        observer: Arc<dyn SweepObserver>,
    ) -> CacheResult<Self> {
        // The reaper schedules its first tick one interval out, the next one after that
        let schedulable = interval
            .checked_mul(2)
            .and_then(|span| Instant::now().checked_add(span))
            .is_some();
        if interval.is_zero() || !schedulable {
            return Err(CacheError::InvalidInterval);
        }
        let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

        let store = Arc::new(Mutex::new(CacheStore::new(interval)));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = spawn_reaper(
            &runtime,
            store.clone(),
            interval,
            observer.clone(),
            shutdown_rx,
        );

        Ok(Self {
            store,
            interval,
            observer,
            reaper: Arc::new(ReaperHandle::new(shutdown_tx, task)),
        })
    }

    // == Add ==
    /// Stores `value` under `key`, replacing any previous value and resetting its age.
    pub fn add(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> CacheResult<()> {
        let key = key.into();
        let value = value.into();
        debug!(key = %key, bytes = value.len(), "Caching response");
        self.lock().add(key, value);
        Ok(())
    }

    // == Get ==
    /// Returns a copy of the value stored under `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        Ok(self.lock().get(key))
    }

    // == Reap Now ==
    /// Runs one sweep immediately, outside the reaper's schedule.
    pub fn reap_now(&self) -> SweepReport {
        sweep(&self.store, self.observer.as_ref())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    // == Interval ==
    /// Expiration threshold and sweep period, fixed at construction.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Length ==
    /// Returns the current number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // == Is Reaper Running ==
    /// Returns true until the reaper has been stopped or has exited.
    pub fn is_reaper_running(&self) -> bool {
        self.reaper.is_running()
    }

    // == Shutdown ==
    /// Stops the reaper and waits for it to finish.
    ///
    /// Entries stay readable afterwards but no longer expire.
    pub async fn shutdown(&self) {
        self.reaper.stop().await;
    }

    fn lock(&self) -> MutexGuard<'_, CacheStore> {
        // CacheStore has no invariant a panicking holder could break
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("interval", &self.interval)
            .field("entries", &self.len())
            .finish()
    }
}
