//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! Status snapshots are rendered as one JSON object per line so a host
//! script can tail the console.

use log::{info, warn};

use crate::app::events::{AppEvent, TimerStatus};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Single-line JSON rendering of a status snapshot.
pub fn status_json(status: &TimerStatus) -> Option<String> {
    serde_json::to_string(status).ok()
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::CountingStarted { state } => {
                info!("COUNT | {:?} started", state);
            }
            AppEvent::CountingPaused { state, elapsed_secs } => {
                info!("COUNT | {:?} paused at {}s", state, elapsed_secs);
            }
            AppEvent::CountingResumed { state, elapsed_secs } => {
                info!("COUNT | {:?} resumed at {}s", state, elapsed_secs);
            }
            AppEvent::BreakSkipped { from } => {
                info!("SKIP  | {:?} ended early", from);
            }
            AppEvent::Status(status) => match status_json(status) {
                Some(json) => info!("STATUS| {}", json),
                None => warn!("STATUS| serialisation failed: {:?}", status),
            },
        }
    }
}
