//! Button, lamp and timer drivers plus hardware initialisation.

pub mod button;
pub mod hw_init;
pub mod hw_timer;
pub mod lamp_patterns;
pub mod lamps;
pub mod task_pin;
