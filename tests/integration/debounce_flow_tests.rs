//! Integration tests: edge queue → debouncer → event queue → controller.

use crate::mock_hw::{MockClock, MockLamps, RecordingSink};
use pomodoro::app::service::{PomodoroService, drain_events};
use pomodoro::config::TimerConfig;
use pomodoro::drivers::button::{Debouncer, drain_edges};
use pomodoro::events::{
    EdgeConsumer, EdgeNotification, EdgeProducer, EdgeQueue, EventQueue, TimerEvent,
    pending_events, post_event, push_edge_from_isr,
};
use pomodoro::fsm::TimerState;

const EDGE: EdgeNotification = EdgeNotification { gpio: 4 };

struct Pipeline {
    isr: EdgeProducer<'static>,
    edges: EdgeConsumer<'static>,
    events: EventQueue,
    debouncer: Debouncer,
    clock: MockClock,
    svc: PomodoroService,
    lamps: MockLamps,
    sink: RecordingSink,
}

impl Pipeline {
    fn new() -> Self {
        let config = TimerConfig::default();
        let ring: &'static mut EdgeQueue = Box::leak(Box::new(EdgeQueue::new()));
        let (isr, edges) = ring.split();
        let mut p = Self {
            isr,
            edges,
            events: EventQueue::new(),
            debouncer: Debouncer::new(config.debounce_ms),
            clock: MockClock::at_secs(10),
            svc: PomodoroService::new(config),
            lamps: MockLamps::new(),
            sink: RecordingSink::new(),
        };
        post_event(&p.events, TimerEvent::TimerReady).unwrap();
        p.run_controller();
        p
    }

    /// One edge seen by the ISR and handled by the debounce task right away.
    fn edge(&mut self) -> usize {
        push_edge_from_isr(&mut self.isr, EDGE).unwrap();
        drain_edges(&mut self.edges, &self.events, &self.clock, &mut self.debouncer)
    }

    fn run_controller(&mut self) -> usize {
        drain_events(
            &self.events,
            &mut self.svc,
            &self.clock,
            &mut self.lamps,
            &mut self.sink,
        )
    }
}

#[test]
fn bounce_50ms_apart_is_one_press() {
    let mut p = Pipeline::new();
    assert_eq!(p.edge(), 1);
    p.clock.advance_ms(50);
    assert_eq!(p.edge(), 0);

    assert_eq!(pending_events(&p.events), 1);
    assert_eq!(p.run_controller(), 1);
    assert_eq!(p.svc.state(), TimerState::Work);
    assert!(!p.svc.machine().is_started());
}

#[test]
fn presses_250ms_apart_are_two_presses() {
    let mut p = Pipeline::new();
    assert_eq!(p.edge(), 1);
    p.clock.advance_ms(250);
    assert_eq!(p.edge(), 1);

    assert_eq!(p.run_controller(), 2);
    assert_eq!(p.svc.state(), TimerState::Work);
    assert!(p.svc.machine().timer_active());
}

#[test]
fn press_and_release_edges_of_one_click_count_once() {
    let mut p = Pipeline::new();
    // Press edge, contact bounce, release edge 120 ms later.
    for offset_ms in [0, 3, 5, 115, 3] {
        p.clock.advance_ms(offset_ms);
        p.edge();
    }
    assert_eq!(p.run_controller(), 1);
    assert_eq!(p.svc.state(), TimerState::Work);
}

#[test]
fn full_edge_queue_drops_without_blocking() {
    let mut p = Pipeline::new();
    for _ in 0..pomodoro::events::EDGE_QUEUE_DEPTH {
        push_edge_from_isr(&mut p.isr, EDGE).unwrap();
    }
    assert!(push_edge_from_isr(&mut p.isr, EDGE).is_err());

    // The queued edges are still one press once the task drains them.
    assert_eq!(
        drain_edges(&mut p.edges, &p.events, &p.clock, &mut p.debouncer),
        1
    );
}
