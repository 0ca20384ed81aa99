//! embedded-hal peripheral drivers.
//!
//! Generic over `embedded_hal` 1.0 pin and delay traits, so they run on the
//! ESP32 `PinDriver`s and on recorded mock pins in tests alike.

pub mod hx711;
pub mod shift_register;
