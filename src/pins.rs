//! GPIO pin assignments for the Pomodoro lamp board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// User button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// The only input. Interrupts on any edge.
pub const BUTTON_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status lamps (active-low: the pin sinks lamp current)
// ---------------------------------------------------------------------------

pub const LAMP_RED_GPIO: i32 = 5;
pub const LAMP_YELLOW_GPIO: i32 = 6;
pub const LAMP_GREEN_GPIO: i32 = 7;

/// All lamp outputs, red to green.
pub const LAMP_GPIOS: [i32; 3] = [LAMP_RED_GPIO, LAMP_YELLOW_GPIO, LAMP_GREEN_GPIO];
