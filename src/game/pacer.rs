use std::time::Duration;

/// Releases simulation ticks against wall-clock time for interactive play.
///
/// Each call to [`TickPacer::advance`] adds the elapsed time since the last
/// call; once the accumulator reaches the interval one tick is released. The
/// remainder past the interval is carried into the next tick, capped at one
/// interval so a stall never releases a burst of ticks.
#[derive(Debug, Clone)]
pub struct TickPacer {
    interval: Duration,
    accumulated: Duration,
}

impl TickPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the tick interval, keeping accumulated time
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Add elapsed time; returns true when a tick is due
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated += elapsed;

        if self.accumulated < self.interval {
            return false;
        }

        self.accumulated = (self.accumulated - self.interval).min(self.interval);
        true
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
