//! Application service — the hexagonal core.
//!
//! [`PomodoroService`] owns the Pomodoro machine. It turns inbound
//! [`TimerEvent`]s into transitions, reports what happened as
//! [`AppEvent`]s, and re-renders the lamps after every event. All I/O
//! flows through port traits injected at call sites, making the service
//! testable with mock adapters.
//!
//! ```text
//!  EVENT_QUEUE ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │    PomodoroService     │
//!    ClockPort ──▶ │  machine · lamp table  │ ──▶ LampPort
//!                  └────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::TimerConfig;
use crate::drivers::lamp_patterns::{LampPattern, lamp_pattern, write_pattern};
use crate::events::{EventQueue, TimerEvent, Timestamp};
use crate::fsm::context::CountingNotice;
use crate::fsm::{PomodoroMachine, TimerState};

use super::events::{AppEvent, TimerStatus};
use super::ports::{ClockPort, EventSink, LampPort};

// ───────────────────────────────────────────────────────────────
// PomodoroService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct PomodoroService {
    machine: PomodoroMachine,
    /// `CheckTimer` events between two status snapshots.
    status_every: u64,
    tick_count: u64,
}

impl PomodoroService {
    /// Construct the service from configuration. The machine starts in `Off`.
    pub fn new(config: TimerConfig) -> Self {
        let status_every = config.status_interval_ticks();
        Self {
            machine: PomodoroMachine::new(config),
            status_every,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let state = self.machine.state();
        sink.emit(&AppEvent::Started(state));
        info!("PomodoroService started in {:?}", state);
    }

    // ── Per-event orchestration ───────────────────────────────

    /// Process one event: dispatch → report → render lamps.
    pub fn handle(
        &mut self,
        event: TimerEvent,
        now: Timestamp,
        lamps: &mut impl LampPort,
        sink: &mut impl EventSink,
    ) {
        let prev_state = self.machine.state();
        let transition = self.machine.dispatch(event, now);
        let stamp = self.machine.context().now;

        // Counting changes first: a skipped break is reported before the
        // transition it causes.
        if let Some(notice) = self.machine.take_notice() {
            let state = self.machine.state();
            let app_event = match notice {
                CountingNotice::Started => AppEvent::CountingStarted { state },
                CountingNotice::Paused { elapsed_secs } => {
                    AppEvent::CountingPaused { state, elapsed_secs }
                }
                CountingNotice::Resumed { elapsed_secs } => {
                    AppEvent::CountingResumed { state, elapsed_secs }
                }
                CountingNotice::BreakSkipped => AppEvent::BreakSkipped { from: prev_state },
            };
            debug!("{:?}", app_event);
            sink.emit(&app_event);
        }

        if let Some(t) = transition {
            sink.emit(&AppEvent::StateChanged {
                from: t.from,
                to: t.to,
            });
        }

        if let TimerEvent::CheckTimer(_) = event {
            self.tick_count += 1;
            if self.tick_count % self.status_every == 0 {
                sink.emit(&AppEvent::Status(self.status(stamp)));
            }
        }

        write_pattern(self.lamp_pattern(stamp), lamps);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot as of `now`.
    pub fn status(&self, now: Timestamp) -> TimerStatus {
        let state = self.machine.state();
        let elapsed_secs = self.machine.counting_seconds(now);
        let period = self.period_secs(state);
        TimerStatus {
            state,
            elapsed_secs,
            remaining_secs: period.saturating_sub(elapsed_secs),
            timer_active: self.machine.timer_active(),
            paused: self.machine.is_paused(),
            started: self.machine.is_started(),
            short_breaks_taken: self.machine.short_breaks_taken(),
            long_breaks_taken: self.machine.long_breaks_taken(),
        }
    }

    /// Current machine state.
    pub fn state(&self) -> TimerState {
        self.machine.state()
    }

    /// What the lamps should show at `now`.
    pub fn lamp_pattern(&self, now: Timestamp) -> LampPattern {
        lamp_pattern(
            self.machine.state(),
            self.machine.timer_active(),
            self.machine.is_paused(),
            self.machine.is_started(),
            now,
        )
    }

    /// Read-only view of the machine.
    pub fn machine(&self) -> &PomodoroMachine {
        &self.machine
    }

    /// `CheckTimer` events handled since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn period_secs(&self, state: TimerState) -> u64 {
        let cfg = self.machine.config();
        let secs = match state {
            TimerState::Off | TimerState::Idle => 0,
            TimerState::Work => cfg.work_period_secs,
            TimerState::ShortBreak => cfg.short_break_secs,
            TimerState::LongBreak | TimerState::LongBreakLastMinutes => cfg.long_break_secs,
        };
        u64::from(secs)
    }
}

// ───────────────────────────────────────────────────────────────
// Controller task
// ───────────────────────────────────────────────────────────────

/// Controller task body: the only consumer of `events`. Never returns.
pub async fn run_controller(
    events: &EventQueue,
    service: &mut PomodoroService,
    clock: &impl ClockPort,
    lamps: &mut impl LampPort,
    sink: &mut impl EventSink,
) {
    info!("controller: waiting for events");
    loop {
        let event = events.receive().await;
        service.handle(event, clock.now_us(), lamps, sink);
    }
}

/// Handle every event currently queued without waiting.
///
/// Returns the number of events processed.
pub fn drain_events(
    events: &EventQueue,
    service: &mut PomodoroService,
    clock: &impl ClockPort,
    lamps: &mut impl LampPort,
    sink: &mut impl EventSink,
) -> usize {
    let mut handled = 0;
    while let Ok(event) = events.try_receive() {
        service.handle(event, clock.now_us(), lamps, sink);
        handled += 1;
    }
    handled
}
