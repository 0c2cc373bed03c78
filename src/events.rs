//! Interrupt- and tick-driven event plumbing.
//!
//! Two bounded queues connect the three execution contexts:
//!
//! ```text
//! ┌─────────────┐  EdgeNotification  ┌───────────────┐
//! │ Button ISR  │───────────────────▶│ Debounce task │──┐
//! └─────────────┘  EdgeQueue (SPSC,  └───────────────┘  │ TimerAction
//!                   lock-free)                          ▼
//! ┌─────────────┐   CheckTimer(now)   ┌──────────────────────┐
//! │ Tick timer  │────────────────────▶│ EVENT_QUEUE          │
//! └─────────────┘                     │ (single consumer)    │
//! ┌─────────────┐   TimerReady        │                      │──▶ Controller
//! │ Bootstrap   │────────────────────▶│                      │    (owns machine)
//! └─────────────┘                     └──────────────────────┘
//! ```
//!
//! The edge queue is a `heapless` single-producer/single-consumer ring:
//! the ISR owns the producer half, the debounce task the consumer half, and
//! an enqueue is two atomic loads and one atomic store. It never wakes the
//! consumer; the ISR signals the debounce task separately (see
//! `drivers::button`).
//!
//! Every mutation of the Pomodoro machine goes through `EVENT_QUEUE`, so the
//! tick-driven `CheckTimer` and the button-driven `TimerAction` can never
//! interleave inside a transition.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::spsc;
use log::warn;

use crate::error::QueueError;

/// Microseconds since boot, from the monotonic system timer.
pub type Timestamp = u64;

/// Microseconds per second.
pub const MICROS_PER_SEC: u64 = 1_000_000;

/// Capacity of the ISR → debounce task queue.
pub const EDGE_QUEUE_DEPTH: usize = 10;

/// Capacity of the ordered event queue feeding the controller.
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Inbound events understood by the Pomodoro state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Initialisation finished; leaves `Off`.
    TimerReady,
    /// Alternate start trigger, equivalent to the first press in `Idle`.
    StartTimer,
    /// Abandon the current period and return to `Idle`.
    ResetTimer,
    /// Periodic re-evaluation of the running period.
    CheckTimer(Timestamp),
    /// One debounced button press.
    TimerAction,
}

/// Raw edge seen on the button GPIO. Press and release are not distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeNotification {
    pub gpio: i32,
}

/// Backing slots of the edge ring; one slot stays free to tell full from empty.
pub const EDGE_QUEUE_SLOTS: usize = EDGE_QUEUE_DEPTH + 1;

/// ISR → debounce task ring. Split once into its two halves.
pub type EdgeQueue = spsc::Queue<EdgeNotification, EDGE_QUEUE_SLOTS>;

/// Interrupt-side half of the edge ring.
pub type EdgeProducer<'a> = spsc::Producer<'a, EdgeNotification, EDGE_QUEUE_SLOTS>;

/// Debounce-task half of the edge ring.
pub type EdgeConsumer<'a> = spsc::Consumer<'a, EdgeNotification, EDGE_QUEUE_SLOTS>;

/// Tick source / debounce task → controller queue.
pub type EventQueue = Channel<CriticalSectionRawMutex, TimerEvent, EVENT_QUEUE_DEPTH>;

/// Event queue used by the firmware wiring.
pub static EVENT_QUEUE: EventQueue = Channel::new();

/// Enqueue a raw edge from interrupt context.
///
/// Lock-free and allocation-free. A full queue drops the notification:
/// the consumer runs continuously, so a backlog only builds up during a
/// burst of contact bounce, which the debouncer would discard anyway.
pub fn push_edge_from_isr(
    edges: &mut EdgeProducer<'_>,
    edge: EdgeNotification,
) -> Result<(), QueueError> {
    edges.enqueue(edge).map_err(|_| QueueError::EdgeQueueFull)
}

/// Post an event for the controller. Never blocks.
///
/// A full queue drops the event and reports `EventQueueFull`. A lost
/// `CheckTimer` is harmless (the next tick re-evaluates), so the periodic
/// callers only log.
pub fn post_event(queue: &EventQueue, event: TimerEvent) -> Result<(), QueueError> {
    queue.try_send(event).map_err(|_| {
        warn!("event queue full, dropping {:?}", event);
        QueueError::EventQueueFull
    })
}

/// Number of events waiting for the controller.
pub fn pending_events(queue: &EventQueue) -> usize {
    queue.len()
}
