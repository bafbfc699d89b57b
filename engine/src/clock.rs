//! Clocks used to stamp record creation times.
//!
//! The engine never reads the system time directly; it asks a [`Clock`].
//! Hosts pick the wall clock, tests and scripted hosts pick the logical one.

use crate::Timestamp;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of creation timestamps.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;

    /// Note a timestamp seen on a record from elsewhere.
    ///
    /// Clocks that care about causality move forward so the next local
    /// timestamp is not behind anything already observed.
    fn observe(&self, _seen: Timestamp) {}
}

/// Wall clock in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or(0)
    }
}

/// A logical clock: a counter that ticks on every read.
///
/// Ordering rules:
/// 1. Every `now()` is strictly greater than the previous one, until the
///    counter saturates at `u64::MAX`
/// 2. `observe` merges in the max of the local and observed values
#[derive(Debug, Default)]
pub struct LogicalClock {
    counter: AtomicU64,
}

impl LogicalClock {
    /// Create a new clock starting at counter 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock with a specific counter value.
    pub fn starting_at(counter: u64) -> Self {
        Self {
            counter: AtomicU64::new(counter),
        }
    }

    /// Current counter value without ticking.
    pub fn counter(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Clock for LogicalClock {
    fn now(&self) -> Timestamp {
        let previous = self
            .counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                Some(c.saturating_add(1))
            })
            .unwrap_or_else(|c| c);
        previous.saturating_add(1)
    }

    fn observe(&self, seen: Timestamp) {
        self.counter.fetch_max(seen, Ordering::SeqCst);
    }
}
