// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time sources for pointer samples and interaction ages.

use alloc::rc::Rc;
use core::cell::Cell;

use crate::types::Timestamp;

/// A source of wall-clock milliseconds.
pub trait Clock {
    /// Current time in milliseconds.
    fn now(&self) -> Timestamp;
}

/// A clock the host advances explicitly.
///
/// Clones share the same time, so a host can keep one handle and give another
/// to the engine.
///
/// ```
/// use understory_card_events::clock::{Clock, ManualClock};
/// let clock = ManualClock::new(100);
/// let engine_side = clock.clone();
/// clock.advance(25);
/// assert_eq!(engine_side.now(), 125);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    /// Create a clock reading `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Set the current time.
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    /// Move the clock forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Milliseconds since the Unix epoch.
#[cfg(feature = "std")]
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        // A clock set before the epoch reads as zero.
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_shares_time_across_clones() {
        let a = ManualClock::new(10);
        let b = a.clone();
        a.advance(5);
        assert_eq!(b.now(), 15, "clones observe advances");
        b.set(3);
        assert_eq!(a.now(), 3, "set is shared too");
    }

    #[cfg(feature = "std")]
    #[test]
    fn system_clock_is_past_epoch() {
        assert!(SystemClock.now() > 0, "system time should be after 1970");
    }
}
