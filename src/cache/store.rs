//! Cache Store Module
//!
//! Unsynchronized key/value storage with interval-based reaping. The `Cache`
//! handle wraps it in a mutex.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Byte payloads keyed by exact-match strings.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Expiration threshold applied by `reap`
    interval: Duration,
    /// Lookup and sweep statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store whose entries expire after `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            interval,
            stats: CacheStats::new(),
        }
    }

    // == Add ==
    /// Inserts or replaces the entry for `key`, stamping it with the current instant.
    ///
    /// Overwriting resets the entry's age.
    pub fn add(&mut self, key: String, value: Vec<u8>) {
        self.add_at(key, value, Instant::now());
    }

    /// Inserts or replaces the entry for `key` with an explicit creation instant.
    pub fn add_at(&mut self, key: String, value: Vec<u8>, created_at: Instant) {
        self.entries
            .insert(key, CacheEntry::created_at(value, created_at));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a copy of the value stored for `key`.
    ///
    /// Entry age is not checked here; stale entries stay visible until the next `reap`.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Reap ==
    /// Removes every entry older than the interval as of `now`.
    ///
    /// Returns the number of entries removed.
    pub fn reap(&mut self, now: Instant) -> usize {
        let interval = self.interval;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_stale(now, interval));
        let removed = before - self.entries.len();

        self.stats.record_sweep(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Interval ==
    /// Age past which `reap` removes an entry.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    // == Length ==
    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
