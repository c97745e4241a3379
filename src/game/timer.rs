//! Cancellable one-second countdown driving the round clock

use std::time::{Duration, Instant};

/// Period between round clock ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A periodic tick source. At most one arming is live at a time: starting
/// again replaces the previous schedule instead of adding a second one.
#[derive(Debug, Clone)]
pub struct Countdown {
    period: Duration,
    next_due: Option<Instant>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the countdown; first tick is one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Disarm. Pending ticks are dropped.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of whole periods that elapsed since the last call.
    pub fn due(&mut self, now: Instant) -> u32 {
        let Some(mut next) = self.next_due else {
            return 0;
        };
        let mut ticks = 0;
        while next <= now {
            ticks += 1;
            next += self.period;
        }
        self.next_due = Some(next);
        ticks
    }

    /// Time until the next tick, for sizing the event poll timeout
    pub fn until_next(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|next| next.saturating_duration_since(now))
    }
}
