//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to           |
//! |------------|------------|-----------------------|
//! | `hardware` | LampPort   | Three lamp GPIOs      |
//! | `log_sink` | EventSink  | Serial log output     |
//! | `time`     | ClockPort  | ESP32 system timer    |

pub mod hardware;
pub mod log_sink;
pub mod time;
