//! Lamp pattern table: timer state → three lamp levels.
//!
//! Pure function of the machine's state and flags plus a 1 Hz blink phase.
//! The controller calls it after every dispatched event and writes the
//! result through [`LampPort`].
//!
//! ## Pattern table (logical levels; wiring polarity is the driver's job)
//!
//! | State                     | Condition         | Red   | Yellow | Green |
//! |---------------------------|-------------------|-------|--------|-------|
//! | Off                       | —                 | on    | on     | on    |
//! | Idle                      | —                 | off   | blink  | off   |
//! | Work                      | not started       | on    | on     | off   |
//! | Work                      | paused            | off   | blink  | on    |
//! | Work                      | running           | off   | off    | on    |
//! | ShortBreak / LongBreak(*) | not started       | off   | on     | on    |
//! | ShortBreak                | started           | blink | off    | off   |
//! | LongBreak                 | started           | on    | off    | off   |
//! | LongBreakLastMinutes      | started           | blink | off    | off   |
//!
//! All blinking lamps share one phase, so they blink together.

use crate::app::ports::LampPort;
use crate::events::{MICROS_PER_SEC, Timestamp};
use crate::fsm::TimerState;

/// Lamp identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lamp {
    Red,
    Yellow,
    Green,
}

impl Lamp {
    pub const ALL: [Lamp; 3] = [Lamp::Red, Lamp::Yellow, Lamp::Green];
}

/// Logical on/off level for each lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LampPattern {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl LampPattern {
    pub const ALL_ON: Self = Self::new(true, true, true);
    pub const ALL_OFF: Self = Self::new(false, false, false);

    pub const fn new(red: bool, yellow: bool, green: bool) -> Self {
        Self { red, yellow, green }
    }

    /// Level of a single lamp.
    pub fn level(&self, lamp: Lamp) -> bool {
        match lamp {
            Lamp::Red => self.red,
            Lamp::Yellow => self.yellow,
            Lamp::Green => self.green,
        }
    }
}

/// Shared blink phase: on during even seconds since boot.
pub fn blink_phase(now: Timestamp) -> bool {
    (now / MICROS_PER_SEC) % 2 == 0
}

/// Map the machine's observable state to lamp levels at `now`.
pub fn lamp_pattern(
    state: TimerState,
    timer_active: bool,
    is_paused: bool,
    is_started: bool,
    now: Timestamp,
) -> LampPattern {
    let blink = blink_phase(now);

    match state {
        TimerState::Off => LampPattern::ALL_ON,
        TimerState::Idle => LampPattern::new(false, blink, false),

        TimerState::Work if !is_started => LampPattern::new(true, true, false),
        // Started but not counting means paused.
        TimerState::Work if is_paused || !timer_active => LampPattern::new(false, blink, true),
        TimerState::Work => LampPattern::new(false, false, true),

        TimerState::ShortBreak | TimerState::LongBreak | TimerState::LongBreakLastMinutes
            if !is_started =>
        {
            LampPattern::new(false, true, true)
        }
        TimerState::ShortBreak | TimerState::LongBreakLastMinutes => {
            LampPattern::new(blink, false, false)
        }
        TimerState::LongBreak => LampPattern::new(true, false, false),
    }
}

/// Push a pattern to the lamps, one call per lamp.
pub fn write_pattern(pattern: LampPattern, lamps: &mut impl LampPort) {
    for lamp in Lamp::ALL {
        lamps.set_lamp(lamp, pattern.level(lamp));
    }
}
