//! Time sources and the fixed-period ticker.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Monotonic time source the loop waits on.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall clock backed by [`Instant`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock; sleeping advances time instantly.
///
/// Clones share the same time, so a test can hold one and move time
/// forward while the loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping, e.g. to simulate slow work.
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
    }
}

/// Fixed-period tick boundaries.
///
/// Boundaries sit on a fixed grid while the loop keeps up. A late tick
/// moves the next boundary to one period after the moment it was
/// noticed; missed ticks are not replayed.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next: Option<Duration>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Wait for the next boundary. The first boundary is one period after
    /// the first call.
    ///
    /// Returns how late the boundary was, if it had already passed.
    pub fn wait(&mut self, clock: &mut dyn Clock) -> Option<Duration> {
        let now = clock.now();
        let deadline = *self.next.get_or_insert(now + self.period);
        if now < deadline {
            clock.sleep(deadline - now);
            self.next = Some(deadline + self.period);
            None
        } else {
            self.next = Some(now + self.period);
            Some(now - deadline)
        }
    }
}
