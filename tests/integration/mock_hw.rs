//! Mock adapters for integration tests.
//!
//! Records every lamp write and every emitted event so tests can assert
//! on the full history without touching real GPIO registers.

use core::cell::Cell;

use pomodoro::app::events::AppEvent;
use pomodoro::app::ports::{ClockPort, EventSink, LampPort};
use pomodoro::drivers::lamp_patterns::{Lamp, LampPattern};
use pomodoro::events::{MICROS_PER_SEC, Timestamp};

// ── MockLamps ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockLamps {
    pub writes: Vec<(Lamp, bool)>,
    pub current: LampPattern,
}

#[allow(dead_code)]
impl MockLamps {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LampPort for MockLamps {
    fn set_lamp(&mut self, lamp: Lamp, on: bool) {
        self.writes.push((lamp, on));
        match lamp {
            Lamp::Red => self.current.red = on,
            Lamp::Yellow => self.current.yellow = on,
            Lamp::Green => self.current.green = on,
        }
    }
}

// ── MockClock ─────────────────────────────────────────────────

/// Manually advanced clock.
pub struct MockClock {
    now: Cell<Timestamp>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at_secs(secs: u64) -> Self {
        Self {
            now: Cell::new(secs * MICROS_PER_SEC),
        }
    }

    pub fn set_us(&self, us: Timestamp) {
        self.now.set(us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + ms * 1_000);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.now.set(self.now.get() + secs * MICROS_PER_SEC);
    }
}

impl ClockPort for MockClock {
    fn now_us(&self) -> Timestamp {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> Vec<(pomodoro::fsm::TimerState, pomodoro::fsm::TimerState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
