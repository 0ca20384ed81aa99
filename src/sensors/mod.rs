//! Sensor conversions layered on top of raw port readings.

pub mod temperature;
