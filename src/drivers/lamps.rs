//! Three-lamp status output driver.
//!
//! Red, yellow and green lamps on discrete GPIOs, wired active-low
//! (the pin sinks the lamp current, so a LOW level lights it).
//!
//! ## Dual-target design
//!
//! The driver is generic over [`OutputPin`]. On ESP-IDF the firmware uses
//! [`GpioOutput`], which writes through `hw_init`; on host/test any
//! `OutputPin` (including [`GpioOutput`], whose writes are no-ops) works.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::warn;

use crate::drivers::hw_init;
use crate::drivers::lamp_patterns::{Lamp, LampPattern};

/// A GPIO configured as output by [`hw_init::init_peripherals`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioOutput {
    gpio: i32,
}

impl GpioOutput {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}

/// The three status lamps.
pub struct StatusLamps<R, Y, G> {
    red: R,
    yellow: Y,
    green: G,
    current: LampPattern,
}

impl<R, Y, G> StatusLamps<R, Y, G>
where
    R: OutputPin,
    Y: OutputPin,
    G: OutputPin,
{
    /// Take ownership of the pins and switch every lamp off.
    pub fn new(red: R, yellow: Y, green: G) -> Self {
        let mut lamps = Self {
            red,
            yellow,
            green,
            current: LampPattern::ALL_OFF,
        };
        for lamp in Lamp::ALL {
            lamps.set(lamp, false);
        }
        lamps
    }

    /// Drive one lamp to a logical level.
    pub fn set(&mut self, lamp: Lamp, on: bool) {
        let result = match lamp {
            Lamp::Red => drive_active_low(&mut self.red, on),
            Lamp::Yellow => drive_active_low(&mut self.yellow, on),
            Lamp::Green => drive_active_low(&mut self.green, on),
        };
        if let Err(e) = result {
            warn!("lamps: {:?} write failed: {:?}", lamp, e);
            return;
        }

        match lamp {
            Lamp::Red => self.current.red = on,
            Lamp::Yellow => self.current.yellow = on,
            Lamp::Green => self.current.green = on,
        }
    }

    /// Last levels successfully written.
    pub fn current(&self) -> LampPattern {
        self.current
    }

    /// Give the pins back.
    pub fn release(self) -> (R, Y, G) {
        (self.red, self.yellow, self.green)
    }
}

fn drive_active_low<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
    use embedded_hal::digital::Error;

    let result = if on { pin.set_low() } else { pin.set_high() };
    result.map_err(|e| e.kind())
}
