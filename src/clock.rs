//! # Clock Module
//!
//! Monotonic millisecond time source for every timing decision in the bridge.
//!
//! The poll driver samples the clock once per `check` and hands that single
//! timestamp to every component, so all comparisons inside one poll agree.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Milliseconds on a monotonic clock.
pub type Millis = u64;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Current time in milliseconds. Must never go backwards.
    fn now_ms(&self) -> Millis;
}

/// Wall-independent clock backed by [`Instant`], counting from creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Hand-driven clock for tests and replays.
///
/// # Examples
///
/// ```
/// use steamband_pad::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(100);
/// clock.advance(50);
/// assert_eq!(clock.now_ms(), 150);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<Millis>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ms: Millis) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    /// Jumps to `ms`. Ignored if it would move time backwards.
    pub fn set(&self, ms: Millis) {
        if ms >= self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Lets a test keep a handle on a [`ManualClock`] it has given away.
impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}
