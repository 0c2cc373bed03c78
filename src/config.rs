//! Timer configuration parameters
//!
//! All tunable periods and timings for the Pomodoro appliance.
//! Defaults match the classic 45/15/30 cycle the lamps were designed around.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Length of a work period (seconds).
pub const WORK_PERIOD_SECS: u32 = 2700;
/// Length of a short break (seconds).
pub const SHORT_BREAK_PERIOD_SECS: u32 = 900;
/// Length of a long break, including its last-minutes tail (seconds).
pub const LONG_BREAK_PERIOD_SECS: u32 = 1800;
/// Number of short breaks completed before the next break is a long one.
pub const LONG_BREAK_AFTER: u32 = 4;

/// Minimum spacing between two accepted button edges (milliseconds).
pub const DEBOUNCE_WINDOW_MS: u32 = 200;

/// Core timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    // --- Periods ---
    /// Work period length (seconds)
    pub work_period_secs: u32,
    /// Short break length (seconds)
    pub short_break_secs: u32,
    /// Long break length (seconds), last-minutes tail included
    pub long_break_secs: u32,

    // --- Long break ---
    /// Whether completed work periods can lead into a long break at all
    pub long_break_enabled: bool,
    /// Short breaks to complete before a long break
    pub long_break_after: u32,

    // --- Input ---
    /// Button debounce window (milliseconds)
    pub debounce_ms: u32,

    // --- Timing ---
    /// Periodic tick interval (milliseconds)
    pub tick_interval_ms: u32,
    /// Status report interval (seconds)
    pub status_interval_secs: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            // Periods
            work_period_secs: WORK_PERIOD_SECS,
            short_break_secs: SHORT_BREAK_PERIOD_SECS,
            long_break_secs: LONG_BREAK_PERIOD_SECS,

            // Long break
            long_break_enabled: cfg!(feature = "long-break"),
            long_break_after: LONG_BREAK_AFTER,

            // Input
            debounce_ms: DEBOUNCE_WINDOW_MS,

            // Timing
            tick_interval_ms: 1000,  // 1 Hz
            status_interval_secs: 60, // 1/min
        }
    }
}

impl TimerConfig {
    /// Elapsed seconds into a long break at which the last-minutes tail begins.
    pub fn long_break_tail_starts_at(&self) -> u32 {
        self.long_break_secs.saturating_sub(self.short_break_secs)
    }

    /// Number of control ticks between two status reports (at least one).
    pub fn status_interval_ticks(&self) -> u64 {
        let ticks = u64::from(self.status_interval_secs) * 1000 / u64::from(self.tick_interval_ms.max(1));
        ticks.max(1)
    }

    /// Reject configurations the state machine cannot run sensibly.
    pub fn validate(&self) -> Result<()> {
        if self.work_period_secs == 0 {
            return Err(Error::Config("work_period_secs must be > 0"));
        }
        if self.short_break_secs == 0 {
            return Err(Error::Config("short_break_secs must be > 0"));
        }
        if self.long_break_secs <= self.short_break_secs {
            return Err(Error::Config("long_break_secs must exceed short_break_secs"));
        }
        if self.long_break_enabled && self.long_break_after == 0 {
            return Err(Error::Config("long_break_after must be > 0 when long breaks are enabled"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be > 0"));
        }
        Ok(())
    }
}
