//! Time sources and heartbeat pacing.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::SchedulerConfig;

/// Monotonic time since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time, measured from construction.
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
}

/// Deterministic clock moved by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Turns elapsed clock time into heartbeats at a fixed interval.
///
/// A slow caller gets at most `max_catch_up` beats per poll; the rest of
/// the backlog is dropped so the robot never sprints to catch up.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    interval: Duration,
    max_catch_up: u32,
    last: Option<Duration>,
}

impl Heartbeat {
    pub fn new(interval: Duration, max_catch_up: u32) -> Self {
        Self {
            interval,
            max_catch_up: max_catch_up.max(1),
            last: None,
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.heartbeat_interval(), config.max_catch_up)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Heartbeats due since the previous poll. The first poll starts the
    /// cadence and returns zero.
    pub fn due(&mut self, clock: &dyn Clock) -> u32 {
        let now = clock.now();
        let Some(last) = self.last else {
            self.last = Some(now);
            return 0;
        };
        if self.interval.is_zero() {
            self.last = Some(now);
            return 1;
        }
        let beats = now.saturating_sub(last).as_nanos() / self.interval.as_nanos();
        if beats > u128::from(self.max_catch_up) {
            self.last = Some(now);
            return self.max_catch_up;
        }
        let beats = beats as u32;
        self.last = Some(last + self.interval * beats);
        beats
    }

    /// Time left until the next beat is due.
    pub fn until_next(&self, clock: &dyn Clock) -> Duration {
        match self.last {
            None => Duration::ZERO,
            Some(last) => (last + self.interval).saturating_sub(clock.now()),
        }
    }
}
