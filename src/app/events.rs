//! Outbound application events.
//!
//! The [`PomodoroService`](super::service::PomodoroService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use serde::Serialize;

use crate::fsm::TimerState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(TimerState),

    /// The machine transitioned between states.
    StateChanged { from: TimerState, to: TimerState },

    /// A fresh countdown began in `state`.
    CountingStarted { state: TimerState },

    /// The countdown was frozen.
    CountingPaused { state: TimerState, elapsed_secs: u64 },

    /// A frozen countdown continued.
    CountingResumed { state: TimerState, elapsed_secs: u64 },

    /// A started break was ended early by a press.
    BreakSkipped { from: TimerState },

    /// Periodic status snapshot.
    Status(TimerStatus),
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerStatus {
    pub state: TimerState,
    pub elapsed_secs: u64,
    /// Seconds left in the current period; 0 in `Off` and `Idle`.
    pub remaining_secs: u64,
    pub timer_active: bool,
    pub paused: bool,
    pub started: bool,
    pub short_breaks_taken: u32,
    pub long_breaks_taken: u32,
}
