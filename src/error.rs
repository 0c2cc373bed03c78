//! Unified error types for the Pomodoro firmware.
//!
//! The timer core itself is total: every (state, event) pair has a defined
//! outcome, so nothing in `fsm` returns an error. What can fail is the
//! environment around it: configuration, peripheral bring-up, and the
//! bounded queues between execution contexts. All variants are `Copy`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid.
    Config(&'static str),
    /// Peripheral or task initialisation failed.
    Init(&'static str),
    /// A bounded queue rejected an item.
    Queue(QueueError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Queue(e) => write!(f, "queue: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Queue errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Edge queue full; the notification was dropped.
    EdgeQueueFull,
    /// Event queue full; the event was dropped.
    EventQueueFull,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EdgeQueueFull => write!(f, "edge queue full"),
            Self::EventQueueFull => write!(f, "event queue full"),
        }
    }
}

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
