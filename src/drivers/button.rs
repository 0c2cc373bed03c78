//! ISR-fed button debouncer.
//!
//! ## Hardware
//!
//! Momentary switch with internal pull-up, interrupt on any edge. The ISR
//! does nothing but enqueue an [`EdgeNotification`] on the lock-free edge
//! ring and notify the debounce task; timing, filtering and event
//! generation happen in that task.
//!
//! ## Filtering
//!
//! An edge is accepted when at least `debounce_ms` has passed since the
//! last *accepted* edge. Rejected edges do not move the reference point,
//! so a bounce burst shorter than the window collapses into one press.
//! Each accepted edge becomes exactly one `TimerAction`.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicPtr, Ordering};

use log::{debug, info};

use crate::app::ports::ClockPort;
use crate::events::{
    EdgeConsumer, EdgeNotification, EdgeProducer, EventQueue, Timestamp, TimerEvent, post_event,
    push_edge_from_isr,
};

/// FreeRTOS handle of the debounce task, published once it starts.
#[cfg(target_os = "espidf")]
static DEBOUNCE_TASK: AtomicPtr<core::ffi::c_void> = AtomicPtr::new(core::ptr::null_mut());

/// Host builds have no task notifications; the debounce loop polls.
#[cfg(not(target_os = "espidf"))]
const SIM_EDGE_POLL_MS: u64 = 5;

/// Time-window edge filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window_us: u64,
    last_accepted_at: Option<Timestamp>,
}

impl Debouncer {
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            window_us: u64::from(debounce_ms) * 1_000,
            last_accepted_at: None,
        }
    }

    /// Decide whether an edge observed at `now` counts as a press.
    pub fn accept(&mut self, now: Timestamp) -> bool {
        if let Some(last) = self.last_accepted_at {
            // Saturating: an earlier-than-last timestamp reads as "no time
            // passed" and is rejected.
            if now.saturating_sub(last) < self.window_us {
                return false;
            }
        }
        self.last_accepted_at = Some(now);
        true
    }

    pub fn last_accepted_at(&self) -> Option<Timestamp> {
        self.last_accepted_at
    }
}

/// ISR handler. Register this on the button GPIO with the producer half
/// of the edge ring.
///
/// One lock-free enqueue plus a FreeRTOS task notification. No logging, no
/// allocation, no lock shared with a task. A full ring drops the edge.
pub fn button_isr_handler(edges: &mut EdgeProducer<'_>, gpio: i32) {
    let _ = push_edge_from_isr(edges, EdgeNotification { gpio });
    notify_debounce_task();
}

#[cfg(target_os = "espidf")]
fn notify_debounce_task() {
    let task = DEBOUNCE_TASK.load(Ordering::Acquire);
    if task.is_null() {
        // Task not up yet; the edge waits in the ring for its first drain.
        return;
    }
    // SAFETY: the handle was published by the debounce task, which never
    // exits. `notify_and_yield` uses the FromISR API inside an interrupt.
    let _ = unsafe {
        esp_idf_svc::hal::task::notify_and_yield(task.cast(), core::num::NonZeroU32::MIN)
    };
}

#[cfg(not(target_os = "espidf"))]
fn notify_debounce_task() {}

#[cfg(target_os = "espidf")]
fn register_debounce_task() {
    if let Some(task) = esp_idf_svc::hal::task::current() {
        DEBOUNCE_TASK.store(task.cast(), Ordering::Release);
    }
}

#[cfg(not(target_os = "espidf"))]
fn register_debounce_task() {}

/// Block until the ISR signals a new edge.
///
/// A notification sent while the task is draining stays pending, so the
/// next wait returns at once and no edge is stranded in the ring.
#[cfg(target_os = "espidf")]
fn wait_for_edges() {
    let _ = esp_idf_svc::hal::task::wait_notification(esp_idf_svc::hal::delay::BLOCK);
}

#[cfg(not(target_os = "espidf"))]
fn wait_for_edges() {
    std::thread::sleep(std::time::Duration::from_millis(SIM_EDGE_POLL_MS));
}

/// Filter one edge and forward a `TimerAction` if it counts.
///
/// Returns `true` when an action was posted.
pub fn handle_edge(
    edge: EdgeNotification,
    debouncer: &mut Debouncer,
    clock: &impl ClockPort,
    events: &EventQueue,
) -> bool {
    let now = clock.now_us();
    if !debouncer.accept(now) {
        debug!("button: edge on GPIO {} dropped (bounce)", edge.gpio);
        return false;
    }
    info!("button: press on GPIO {}", edge.gpio);
    post_event(events, TimerEvent::TimerAction).is_ok()
}

/// Debounce task body: sole consumer of the edge ring. Never returns.
pub fn run_debounce_task(
    edges: &mut EdgeConsumer<'_>,
    events: &EventQueue,
    clock: &impl ClockPort,
    debouncer: &mut Debouncer,
) -> ! {
    register_debounce_task();
    info!("button: debounce task waiting for edges");
    loop {
        drain_edges(edges, events, clock, debouncer);
        wait_for_edges();
    }
}

/// Process every edge currently queued without waiting.
///
/// Returns the number of actions posted.
pub fn drain_edges(
    edges: &mut EdgeConsumer<'_>,
    events: &EventQueue,
    clock: &impl ClockPort,
    debouncer: &mut Debouncer,
) -> usize {
    let mut posted = 0;
    while let Some(edge) = edges.dequeue() {
        if handle_edge(edge, debouncer, clock, events) {
            posted += 1;
        }
    }
    posted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EdgeQueue, pending_events};
    use core::cell::Cell;

    const MS: u64 = 1_000;

    struct FakeClock(Cell<Timestamp>);

    impl ClockPort for FakeClock {
        fn now_us(&self) -> Timestamp {
            self.0.get()
        }
    }

    const EDGE: EdgeNotification = EdgeNotification { gpio: 9 };

    #[test]
    fn first_edge_always_accepted() {
        let mut d = Debouncer::new(200);
        assert!(d.accept(0));
        assert_eq!(d.last_accepted_at(), Some(0));
    }

    #[test]
    fn edges_inside_window_rejected() {
        let mut d = Debouncer::new(200);
        assert!(d.accept(1_000 * MS));
        assert!(!d.accept(1_050 * MS));
        assert!(!d.accept(1_199 * MS));
        assert!(d.accept(1_200 * MS));
    }

    #[test]
    fn rejected_edges_do_not_extend_window() {
        let mut d = Debouncer::new(200);
        assert!(d.accept(0));
        for t in [50, 100, 150, 190] {
            assert!(!d.accept(t * MS));
        }
        assert!(d.accept(210 * MS));
    }

    #[test]
    fn earlier_timestamp_is_rejected() {
        let mut d = Debouncer::new(200);
        assert!(d.accept(500 * MS));
        assert!(!d.accept(100 * MS));
        assert_eq!(d.last_accepted_at(), Some(500 * MS));
    }

    #[test]
    fn two_edges_50ms_apart_yield_one_action() {
        let events = EventQueue::new();
        let clock = FakeClock(Cell::new(10_000 * MS));
        let mut d = Debouncer::new(200);

        assert!(handle_edge(EDGE, &mut d, &clock, &events));
        clock.0.set(10_050 * MS);
        assert!(!handle_edge(EDGE, &mut d, &clock, &events));

        assert_eq!(events.try_receive(), Ok(TimerEvent::TimerAction));
        assert!(events.try_receive().is_err());
    }

    #[test]
    fn two_edges_250ms_apart_yield_two_actions() {
        let events = EventQueue::new();
        let clock = FakeClock(Cell::new(10_000 * MS));
        let mut d = Debouncer::new(200);

        assert!(handle_edge(EDGE, &mut d, &clock, &events));
        clock.0.set(10_250 * MS);
        assert!(handle_edge(EDGE, &mut d, &clock, &events));

        assert_eq!(events.try_receive(), Ok(TimerEvent::TimerAction));
        assert_eq!(events.try_receive(), Ok(TimerEvent::TimerAction));
    }

    #[test]
    fn drain_collapses_burst_into_one_press() {
        let mut queue = EdgeQueue::new();
        let (mut tx, mut rx) = queue.split();
        let events = EventQueue::new();
        let clock = FakeClock(Cell::new(0));
        let mut d = Debouncer::new(200);

        for _ in 0..5 {
            push_edge_from_isr(&mut tx, EDGE).unwrap();
        }
        // All five are handled at the same instant.
        assert_eq!(drain_edges(&mut rx, &events, &clock, &mut d), 1);
        assert_eq!(rx.dequeue(), None);
    }

    #[test]
    fn isr_handler_leaves_edge_for_the_debounce_task() {
        let mut queue = EdgeQueue::new();
        let (mut tx, mut rx) = queue.split();
        let events = EventQueue::new();
        let clock = FakeClock(Cell::new(0));
        let mut d = Debouncer::new(200);

        std::thread::scope(|s| {
            std::thread::Builder::new()
                .name("edge-isr".into())
                .spawn_scoped(s, || button_isr_handler(&mut tx, 9))
                .unwrap();
        });

        // Interrupt side only enqueued: nothing filtered, nothing posted.
        assert_eq!(rx.len(), 1);
        assert_eq!(d.last_accepted_at(), None);
        assert_eq!(pending_events(&events), 0);

        assert_eq!(drain_edges(&mut rx, &events, &clock, &mut d), 1);
        assert_eq!(events.try_receive(), Ok(TimerEvent::TimerAction));
    }

    #[test]
    fn isr_handler_drops_edge_when_ring_full() {
        let mut queue = EdgeQueue::new();
        let (mut tx, rx) = queue.split();
        for _ in 0..crate::events::EDGE_QUEUE_DEPTH + 3 {
            button_isr_handler(&mut tx, 9);
        }
        assert_eq!(rx.len(), crate::events::EDGE_QUEUE_DEPTH);
    }
}
