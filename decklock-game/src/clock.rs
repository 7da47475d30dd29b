//! Countdown clock with penalty application and a one-shot terminal signal.
use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_MINUTE;

/// Monotonically decreasing session countdown.
///
/// The clock never goes negative; every mutation clamps at zero. The
/// terminal "time's up" signal is latched: [`ClockController::poll_time_up`]
/// reports it exactly once, whether zero was reached by a tick or by a
/// penalty, and once latched the periodic tick becomes inert (the caller's
/// timer is considered cancelled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockController {
    remaining_seconds: u32,
    time_up_signaled: bool,
}

impl ClockController {
    #[must_use]
    pub const fn new(seconds: u32) -> Self {
        Self {
            remaining_seconds: seconds,
            time_up_signaled: false,
        }
    }

    /// Advance the countdown by one second. No-op after the terminal signal
    /// has fired.
    pub const fn tick(&mut self) {
        if self.time_up_signaled {
            return;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
    }

    /// Subtract a penalty, clamped at zero.
    pub const fn apply_penalty(&mut self, minutes: u32) {
        self.remaining_seconds = self
            .remaining_seconds
            .saturating_sub(minutes * SECONDS_PER_MINUTE);
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// One-shot terminal signal. Returns true exactly once, on the first
    /// poll after the countdown reaches zero. Callers check this after
    /// every mutating operation, not only after ticks.
    pub const fn poll_time_up(&mut self) -> bool {
        if self.time_up_signaled || self.remaining_seconds > 0 {
            return false;
        }
        self.time_up_signaled = true;
        true
    }
}

/// Render seconds as `m:ss` for display layers.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / SECONDS_PER_MINUTE;
    let part = seconds % SECONDS_PER_MINUTE;
    format!("{minutes}:{part:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_counts_down_and_clamps() {
        let mut clock = ClockController::new(2);
        clock.tick();
        assert_eq!(clock.remaining_seconds(), 1);
        clock.tick();
        assert_eq!(clock.remaining_seconds(), 0);
        assert!(clock.poll_time_up());
        clock.tick();
        assert_eq!(clock.remaining_seconds(), 0);
    }

    #[test]
    fn penalty_clamps_at_zero_and_fires_signal() {
        let mut clock = ClockController::new(90);
        clock.apply_penalty(1);
        assert_eq!(clock.remaining_seconds(), 30);
        assert!(!clock.poll_time_up());
        clock.apply_penalty(5);
        assert_eq!(clock.remaining_seconds(), 0);
        assert!(clock.poll_time_up());
    }

    #[test]
    fn time_up_signal_fires_exactly_once() {
        let mut clock = ClockController::new(1);
        clock.tick();
        assert!(clock.poll_time_up());
        assert!(!clock.poll_time_up());
        clock.apply_penalty(3);
        assert!(!clock.poll_time_up());
    }

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(3_600), "60:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(0), "0:00");
    }
}
