//! Integration tests: event queue → PomodoroService → lamps / sink.

use crate::mock_hw::{MockClock, MockLamps, RecordingSink};
use pomodoro::app::events::AppEvent;
use pomodoro::app::ports::ClockPort;
use pomodoro::app::service::{PomodoroService, drain_events};
use pomodoro::config::{LONG_BREAK_AFTER, TimerConfig};
use pomodoro::drivers::lamp_patterns::LampPattern;
use pomodoro::events::{EventQueue, MICROS_PER_SEC, TimerEvent, post_event};
use pomodoro::fsm::TimerState;

const S: u64 = MICROS_PER_SEC;

struct Rig {
    queue: EventQueue,
    svc: PomodoroService,
    clock: MockClock,
    lamps: MockLamps,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: TimerConfig) -> Self {
        let mut rig = Self {
            queue: EventQueue::new(),
            svc: PomodoroService::new(config),
            clock: MockClock::at_secs(1),
            lamps: MockLamps::new(),
            sink: RecordingSink::new(),
        };
        rig.svc.start(&mut rig.sink);
        rig.send(TimerEvent::TimerReady);
        rig
    }

    fn send(&mut self, event: TimerEvent) {
        post_event(&self.queue, event).unwrap();
        drain_events(
            &self.queue,
            &mut self.svc,
            &self.clock,
            &mut self.lamps,
            &mut self.sink,
        );
    }

    fn press(&mut self) {
        self.send(TimerEvent::TimerAction);
    }

    /// Tick at the current clock reading.
    fn tick(&mut self) {
        let now = self.clock.now_us();
        self.send(TimerEvent::CheckTimer(now));
    }

    fn state(&self) -> TimerState {
        self.svc.state()
    }

    /// From an un-started Work: start it and run it to completion.
    fn complete_work(&mut self) {
        assert_eq!(self.state(), TimerState::Work);
        self.press();
        self.clock.advance_secs(2699);
        self.tick();
        assert_eq!(self.state(), TimerState::Work);
        self.clock.advance_secs(1);
        self.tick();
    }
}

#[test]
fn boot_reports_start_then_idle() {
    let rig = Rig::new(TimerConfig::default());
    assert_eq!(rig.sink.events[0], AppEvent::Started(TimerState::Off));
    assert_eq!(rig.sink.transitions(), vec![(TimerState::Off, TimerState::Idle)]);
    assert_eq!(rig.state(), TimerState::Idle);
}

#[test]
fn work_completes_exactly_at_period() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.press();
    assert_eq!(rig.state(), TimerState::Work);
    rig.complete_work();
    assert_eq!(rig.state(), TimerState::ShortBreak);
    assert_eq!(rig.svc.machine().short_breaks_taken(), 1);
}

#[test]
fn full_cycle_reaches_long_break_and_back() {
    if !TimerConfig::default().long_break_enabled {
        return;
    }
    let mut rig = Rig::new(TimerConfig::default());
    rig.press();

    for n in 1..=LONG_BREAK_AFTER {
        rig.complete_work();
        assert_eq!(rig.state(), TimerState::ShortBreak);
        assert_eq!(rig.svc.machine().short_breaks_taken(), n);
        // Start the break and let it run out.
        rig.press();
        rig.clock.advance_secs(900);
        rig.tick();
        assert_eq!(rig.state(), TimerState::Work);
    }

    rig.complete_work();
    assert_eq!(rig.state(), TimerState::LongBreak);
    assert_eq!(rig.svc.machine().short_breaks_taken(), 0);
    assert_eq!(rig.svc.machine().long_breaks_taken(), 1);

    rig.press();
    rig.clock.advance_secs(899);
    rig.tick();
    assert_eq!(rig.state(), TimerState::LongBreak);
    rig.clock.advance_secs(1);
    rig.tick();
    assert_eq!(rig.state(), TimerState::LongBreakLastMinutes);
    // The clock carried over: 900 s more ends the whole long break.
    rig.clock.advance_secs(899);
    rig.tick();
    assert_eq!(rig.state(), TimerState::LongBreakLastMinutes);
    rig.clock.advance_secs(1);
    rig.tick();
    assert_eq!(rig.state(), TimerState::Work);
}

#[test]
fn pause_and_resume_preserve_progress() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.press();
    rig.press();
    rig.clock.advance_secs(10);
    rig.press();
    assert!(rig.svc.machine().is_paused());
    rig.clock.advance_secs(90);
    rig.press();

    assert!(rig.sink.events.contains(&AppEvent::CountingResumed {
        state: TimerState::Work,
        elapsed_secs: 10
    }));

    // 2690 s more of running time completes the period.
    rig.clock.advance_secs(2689);
    rig.tick();
    assert_eq!(rig.state(), TimerState::Work);
    rig.clock.advance_secs(1);
    rig.tick();
    assert_eq!(rig.state(), TimerState::ShortBreak);
}

#[test]
fn reset_returns_to_idle_from_every_running_state() {
    let mut rig = Rig::new(TimerConfig::default());

    rig.send(TimerEvent::ResetTimer);
    assert_eq!(rig.state(), TimerState::Idle);

    rig.press();
    rig.send(TimerEvent::ResetTimer);
    assert_eq!(rig.state(), TimerState::Idle);

    rig.press();
    rig.complete_work();
    rig.press();
    rig.send(TimerEvent::ResetTimer);
    assert_eq!(rig.state(), TimerState::Idle);
    assert!(!rig.svc.machine().is_started());
}

#[test]
fn repeated_tick_with_same_timestamp_transitions_once() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.press();
    rig.complete_work();
    let before = rig.svc.machine().transition_count();
    rig.tick();
    rig.tick();
    assert_eq!(rig.svc.machine().transition_count(), before);
    assert_eq!(rig.state(), TimerState::ShortBreak);
}

#[test]
fn lamps_follow_the_cycle() {
    let mut rig = Rig::new(TimerConfig::default());
    // Odd second: blink phase off.
    assert_eq!(rig.lamps.current, LampPattern::ALL_OFF);

    rig.press();
    assert_eq!(rig.lamps.current, LampPattern::new(true, true, false));
    rig.press();
    assert_eq!(rig.lamps.current, LampPattern::new(false, false, true));

    rig.clock.advance_secs(2700);
    rig.tick();
    assert_eq!(rig.state(), TimerState::ShortBreak);
    assert_eq!(rig.lamps.current, LampPattern::new(false, true, true));
    rig.press();
    rig.clock.advance_secs(1);
    rig.tick();
    // Even second in a running short break: red blink on.
    assert_eq!(rig.lamps.current, LampPattern::new(true, false, false));
}

#[test]
fn every_event_rewrites_all_three_lamps() {
    let mut rig = Rig::new(TimerConfig::default());
    let before = rig.lamps.writes.len();
    rig.send(TimerEvent::StartTimer);
    rig.send(TimerEvent::CheckTimer(0));
    assert_eq!(rig.lamps.writes.len(), before + 6);
}
