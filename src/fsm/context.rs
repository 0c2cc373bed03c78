//! Shared mutable context threaded through every FSM handler.
//!
//! `TimerContext` is the one struct that state handlers read from and
//! write to. It holds the countdown bookkeeping, the break tallies, and
//! the configuration. The break tallies belong to the machine, not to any
//! state: every state handler sees the same counters.

use crate::config::TimerConfig;
use crate::events::{MICROS_PER_SEC, Timestamp};

// ---------------------------------------------------------------------------
// Counting notices (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// Counting changes a handler made that do not show up as a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingNotice {
    /// A fresh countdown began.
    Started,
    /// A running countdown was frozen.
    Paused { elapsed_secs: u64 },
    /// A frozen countdown continued.
    Resumed { elapsed_secs: u64 },
    /// A started break was cut short by a press.
    BreakSkipped,
}

// ---------------------------------------------------------------------------
// TimerContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
#[derive(Debug, Clone)]
pub struct TimerContext {
    // -- Timing --
    /// Timestamp of the event currently being handled.
    pub now: Timestamp,
    /// When the current countdown began; `None` until started.
    pub counting_started_at: Option<Timestamp>,
    /// When the current pause began; `None` while running or not started.
    pub pause_started_at: Option<Timestamp>,
    /// True iff the countdown is running (started and not paused).
    pub timer_active: bool,

    // -- Tallies --
    /// Short breaks entered since the last long break.
    pub short_breaks_taken: u32,
    /// Long breaks entered since boot.
    pub long_breaks_taken: u32,

    // -- Configuration --
    pub config: TimerConfig,

    // -- Outputs --
    /// Set by handlers, taken by the service after each dispatch.
    pub notice: Option<CountingNotice>,
}

impl TimerContext {
    /// Create a new context with the given configuration.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            now: 0,
            counting_started_at: None,
            pause_started_at: None,
            timer_active: false,
            short_breaks_taken: 0,
            long_breaks_taken: 0,
            config,
            notice: None,
        }
    }

    /// Whether a countdown has been started in the current period.
    pub fn is_started(&self) -> bool {
        self.counting_started_at.is_some()
    }

    /// Whether the current countdown is frozen.
    pub fn is_paused(&self) -> bool {
        self.pause_started_at.is_some()
    }

    /// Elapsed seconds of the current period as of `now`, excluding pauses.
    ///
    /// While paused the value is frozen at the moment the pause began.
    /// A clock that runs backwards yields 0 rather than wrapping.
    pub fn counting_seconds_at(&self, now: Timestamp) -> u64 {
        let Some(started) = self.counting_started_at else {
            return 0;
        };
        let until = self.pause_started_at.unwrap_or(now);
        until.saturating_sub(started) / MICROS_PER_SEC
    }

    /// Elapsed seconds as of the event being handled.
    pub fn counting_seconds(&self) -> u64 {
        self.counting_seconds_at(self.now)
    }

    /// Begin or resume counting. No-op while already active.
    pub fn start_counting(&mut self, now: Timestamp) {
        if self.timer_active {
            return;
        }

        let resumed = match (self.counting_started_at, self.pause_started_at) {
            (Some(started), Some(paused)) => {
                // Shift the start forward so the paused interval is not counted.
                let paused_for = now.saturating_sub(paused);
                self.counting_started_at = Some(started.saturating_add(paused_for));
                true
            }
            _ => {
                self.counting_started_at = Some(now);
                false
            }
        };

        self.pause_started_at = None;
        self.timer_active = true;
        self.notice = Some(if resumed {
            CountingNotice::Resumed {
                elapsed_secs: self.counting_seconds_at(now),
            }
        } else {
            CountingNotice::Started
        });
    }

    /// Freeze the countdown. No-op unless active.
    pub fn pause_counting(&mut self, now: Timestamp) {
        if !self.timer_active {
            return;
        }
        self.timer_active = false;
        self.pause_started_at = Some(now);
        self.notice = Some(CountingNotice::Paused {
            elapsed_secs: self.counting_seconds_at(now),
        });
    }

    /// Forget the current countdown entirely.
    pub fn reset_counting(&mut self) {
        self.counting_started_at = None;
        self.pause_started_at = None;
        self.timer_active = false;
    }
}
