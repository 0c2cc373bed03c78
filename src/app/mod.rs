//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the rules that sit on top of the state machine:
//! event dispatch, outbound reporting and lamp rendering. All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
