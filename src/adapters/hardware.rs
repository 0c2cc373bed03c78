//! Hardware adapter — bridges the lamp driver to the domain port trait.
//!
//! Owns the [`StatusLamps`] and exposes them through [`LampPort`]. On
//! non-espidf targets the underlying [`GpioOutput`] pins are no-ops.

use log::trace;

use crate::app::ports::LampPort;
use crate::drivers::lamp_patterns::{Lamp, LampPattern};
use crate::drivers::lamps::{GpioOutput, StatusLamps};
use crate::pins;

/// Concrete adapter for the board's three lamps.
pub struct LampAdapter {
    lamps: StatusLamps<GpioOutput, GpioOutput, GpioOutput>,
}

impl Default for LampAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LampAdapter {
    /// Lamps on the GPIOs from [`pins`], all dark.
    pub fn new() -> Self {
        Self {
            lamps: StatusLamps::new(
                GpioOutput::new(pins::LAMP_RED_GPIO),
                GpioOutput::new(pins::LAMP_YELLOW_GPIO),
                GpioOutput::new(pins::LAMP_GREEN_GPIO),
            ),
        }
    }

    /// What the lamps currently show.
    pub fn current(&self) -> LampPattern {
        self.lamps.current()
    }
}

// ── LampPort implementation ───────────────────────────────────

impl LampPort for LampAdapter {
    fn set_lamp(&mut self, lamp: Lamp, on: bool) {
        if self.lamps.current().level(lamp) != on {
            trace!("lamp {:?} -> {}", lamp, if on { "on" } else { "off" });
        }
        self.lamps.set(lamp, on);
    }
}
