//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored payload and the instant it was last written.
///
/// Timestamps use `tokio::time::Instant` so paused test clocks drive expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored bytes, opaque to the cache
    pub value: Vec<u8>,
    /// Instant of insertion or last overwrite
    pub created_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: Vec<u8>) -> Self {
        Self::created_at(value, Instant::now())
    }

    /// Creates an entry with an explicit creation instant.
    pub fn created_at(value: Vec<u8>, created_at: Instant) -> Self {
        Self { value, created_at }
    }

    // == Age ==
    /// Time elapsed between creation and `now`, zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived `interval` as of `now`.
    ///
    /// Strictly greater: an entry exactly `interval` old survives.
    pub fn is_stale(&self, now: Instant, interval: Duration) -> bool {
        self.age(now) > interval
    }
}
