//! NTC thermistor temperature sensor (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage divider with a fixed 10 kOhm resistor, read through
//! any [`AdcPort`].  The simplified Beta (Steinhart-Hart) equation converts
//! resistance to temperature.
//!
//! A rail-to-rail reading means an open or shorted thermistor and is
//! reported as [`SensorError::OutOfRange`] instead of a made-up value.

use crate::app::ports::{AdcPort, TemperaturePort};
use crate::error::SensorError;

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

/// Plausible range for a thermistor on this board.
const MIN_C: f32 = -40.0;
const MAX_C: f32 = 125.0;

pub struct TemperatureSensor<A: AdcPort> {
    adc: A,
}

impl<A: AdcPort> TemperatureSensor<A> {
    pub fn new(adc: A) -> Self {
        Self { adc }
    }

    pub fn adc(&self) -> &A {
        &self.adc
    }
}

impl<A: AdcPort> TemperaturePort for TemperatureSensor<A> {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        let raw = self.adc.read_raw()?;
        adc_to_celsius(raw).ok_or(SensorError::OutOfRange)
    }
}

/// Convert a 12-bit divider reading to degrees Celsius.
pub fn adc_to_celsius(raw: u16) -> Option<f32> {
    let voltage = (f32::from(raw) / ADC_MAX) * V_REF;
    if voltage <= 0.01 || voltage >= (V_REF - 0.01) {
        return None;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return None;
    }
    let celsius = (1.0 / inv_t) - 273.15;
    (MIN_C..=MAX_C).contains(&celsius).then_some(celsius)
}
