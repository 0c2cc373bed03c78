//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PomodoroService (domain)
//! ```
//!
//! Driven adapters (clock, lamps, event sinks) implement these traits.
//! The [`PomodoroService`](super::service::PomodoroService) and the
//! debounce task consume them via generics, so the domain core never
//! touches hardware directly.

use crate::drivers::lamp_patterns::Lamp;
use crate::events::Timestamp;

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: hardware timer → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.
pub trait ClockPort {
    /// Microseconds since boot. Never decreases on real hardware.
    fn now_us(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Lamp port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the three status lamps.
pub trait LampPort {
    /// Set one lamp to a logical level (`true` = lit).
    fn set_lamp(&mut self, lamp: Lamp, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
