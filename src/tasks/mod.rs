//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the lifetime of a cache.
//!
//! # Tasks
//! - Reaper: Removes outdated cache entries once per cache interval

mod reaper;

pub use reaper::{spawn_reaper, sweep, LogObserver, ReaperHandle, SweepObserver, SweepReport};
