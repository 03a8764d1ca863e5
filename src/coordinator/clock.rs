use std::time::{Duration, Instant};

use crate::foundation::core::Timestamp;

/// Monotonic time source.
pub trait Clock {
    /// Current time.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] measuring from its own construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed())
    }
}

/// The host's periodic timer. Each expiry must call
/// [`FlashCoordinator::on_tick`](crate::FlashCoordinator::on_tick) on the UI thread.
pub trait TickTimer {
    /// Start firing every `interval`; restarting a running timer only updates the interval.
    fn start(&mut self, interval: Duration);

    /// Stop firing.
    fn stop(&mut self);

    /// `true` while running.
    fn is_active(&self) -> bool;
}
