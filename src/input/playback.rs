use std::time::Duration;

use super::handler::KeyAction;

/// Runtime switches for watching agents play, owned by the playback loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    pub paused: bool,
    pub slow_down: bool,
    /// Draw only the highest-scoring game instead of all of them
    pub show_only_best: bool,
    pub tick_interval: Duration,
    pub slow_tick_interval: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            paused: false,
            slow_down: false,
            show_only_best: false,
            tick_interval: Duration::from_millis(50),
            slow_tick_interval: Duration::from_millis(200),
        }
    }
}

impl PlaybackOptions {
    /// Flip the switch a key maps to. Returns false for keys that are not toggles.
    pub fn apply(&mut self, action: &KeyAction) -> bool {
        match action {
            KeyAction::TogglePause => self.paused = !self.paused,
            KeyAction::ToggleSlow => self.slow_down = !self.slow_down,
            KeyAction::ToggleShowBest => self.show_only_best = !self.show_only_best,
            _ => return false,
        }
        true
    }

    /// Interval the pacer should currently use
    pub fn current_interval(&self) -> Duration {
        if self.slow_down {
            self.slow_tick_interval
        } else {
            self.tick_interval
        }
    }
}
