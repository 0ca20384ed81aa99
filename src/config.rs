//! Runtime configuration parameters
//!
//! All tunable parameters for the rig. Hardware sizing constants (register
//! count, GPIO numbers) live in [`crate::pins`] instead because they pick
//! concrete driver types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Capacity of the serial line buffer in bytes.
pub const LINE_CAPACITY: usize = 1024;

/// Largest LED strip the animation controller can hold.
pub const MAX_PIXELS: usize = 64;

/// Scale factor used when the stored calibration is unusable.
pub const DEFAULT_SCALE: f32 = 1000.0;

/// Core rig configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigConfig {
    // --- Relays ---
    /// Relay modules are active-low (logical "closed" drives the pin low).
    pub relays_inverted: bool,

    // --- LEDs ---
    /// Number of addressable pixels on the strip.
    pub led_count: u16,
    /// Animation frame rate.
    pub led_fps: u8,
    /// Default fade duration for colour and brightness changes (ms).
    pub transition_ms: u16,
    /// Colour shown after boot.
    pub initial_color: (u8, u8, u8),
    /// Brightness applied after boot (0-255).
    pub initial_brightness: u8,

    // --- Serial CLI ---
    pub baud_rate: u32,
    /// Byte that terminates a command line.
    pub line_break: u8,
    /// Character separating tokens within a line.
    pub separator: char,

    // --- Load cell ---
    /// EEPROM byte offset of the persisted scale factor.
    pub calibration_address: u16,
    /// Scale factor used when nothing valid is stored.
    pub default_scale: f32,
    /// Raw samples averaged for a weight reading.
    pub scale_read_samples: u8,
    /// Raw samples averaged when taring.
    pub tare_samples: u8,
    /// Raw samples averaged when calibrating against a known weight.
    pub calibration_samples: u8,
    /// Maximum wait for data-ready per raw sample (ms).
    pub sensor_ready_timeout_ms: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            // Relays
            relays_inverted: false,

            // LEDs
            led_count: 12,
            led_fps: 50, // 20 ms per frame
            transition_ms: 300,
            initial_color: (255, 0, 0),
            initial_brightness: 255,

            // Serial CLI
            baud_rate: 115_200,
            line_break: b'\n',
            separator: ' ',

            // Load cell
            calibration_address: 0,
            default_scale: DEFAULT_SCALE,
            scale_read_samples: 5,
            tare_samples: 10,
            calibration_samples: 10,
            sensor_ready_timeout_ms: 200, // HX711 at 10 SPS needs ~100 ms
        }
    }
}

impl RigConfig {
    /// Range-check every field. Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.led_count == 0 || self.led_count as usize > MAX_PIXELS {
            return Err(ConfigError::ValidationFailed("led_count must be 1–64"));
        }
        if !(1..=200).contains(&self.led_fps) {
            return Err(ConfigError::ValidationFailed("led_fps must be 1–200"));
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ValidationFailed("baud_rate must be non-zero"));
        }
        if !self.line_break.is_ascii() {
            return Err(ConfigError::ValidationFailed("line_break must be ASCII"));
        }
        if !self.separator.is_ascii() || self.separator as u32 == self.line_break as u32 {
            return Err(ConfigError::ValidationFailed(
                "separator must be ASCII and differ from line_break",
            ));
        }
        if !self.default_scale.is_finite() || self.default_scale == 0.0 {
            return Err(ConfigError::ValidationFailed(
                "default_scale must be finite and non-zero",
            ));
        }
        if self.scale_read_samples == 0 || self.tare_samples == 0 || self.calibration_samples == 0
        {
            return Err(ConfigError::ValidationFailed("sample counts must be >= 1"));
        }
        if !(1..=5000).contains(&self.sensor_ready_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensor_ready_timeout_ms must be 1–5000",
            ));
        }
        Ok(())
    }

    /// Minimum milliseconds between two animation frames.
    pub fn frame_interval_ms(&self) -> u32 {
        1000 / u32::from(self.led_fps.max(1))
    }
}
