//! Injected time source.
//!
//! # Responsibility
//! - Supply nanosecond timestamps to the store without a global clock read.
//!
//! # Invariants
//! - Any `Fn() -> Timestamp` is a valid clock.
//! - Monotonicity is enforced by the store, not by clock implementations.

use crate::model::note::Timestamp;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Capability returning the current host time in nanoseconds.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<F> Clock for F
where
    F: Fn() -> Timestamp,
{
    fn now(&self) -> Timestamp {
        self()
    }
}

/// Wall clock: nanoseconds since the unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // Pre-epoch host time reads as zero; the store never goes backwards.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Deterministic clock that advances by a fixed step on every read.
///
/// Clones share one reading, so a test can keep a handle after moving the
/// clock into a store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    next: Rc<Cell<Timestamp>>,
    step: Timestamp,
}

impl ManualClock {
    pub fn new(start: Timestamp, step: Timestamp) -> Self {
        Self {
            next: Rc::new(Cell::new(start)),
            step,
        }
    }

    /// Moves the next reading to `at`, including backwards.
    pub fn set(&self, at: Timestamp) {
        self.next.set(at);
    }

    /// The value the next `now()` call will return.
    pub fn peek(&self) -> Timestamp {
        self.next.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let current = self.next.get();
        self.next.set(current.saturating_add(self.step));
        current
    }
}
