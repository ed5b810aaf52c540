//! Refresh cadence
//!
//! Pure bookkeeping for the poller's timer: when the next tick is due, given
//! when the previous one fired. Changing the interval moves the next deadline
//! relative to the previous tick, never relative to the time of the change.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Cadence {
    interval: Duration,
    startup_delay: Duration,
    armed_at: Instant,
    last_tick: Option<Instant>,
}

impl Cadence {
    /// Cadence armed at `armed_at`; the first tick comes after `startup_delay`
    pub fn new(interval: Duration, startup_delay: Duration, armed_at: Instant) -> Self {
        Self {
            interval,
            startup_delay,
            armed_at,
            last_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Instant at which the next tick is due
    pub fn next_deadline(&self) -> Instant {
        match self.last_tick {
            Some(last) => last + self.interval,
            None => self.armed_at + self.startup_delay,
        }
    }

    /// Record that a tick fired at `at`
    pub fn record_tick(&mut self, at: Instant) {
        self.last_tick = Some(at);
    }

    /// Change the interval; before the first tick the startup delay still applies
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}
