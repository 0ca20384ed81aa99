//! Application core: pure domain logic, zero I/O.
//!
//! Relay addressing, scale calibration and LED fades live here.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod calibration;
pub mod pixels;
pub mod ports;
pub mod relays;
pub mod scale;
pub mod service;
