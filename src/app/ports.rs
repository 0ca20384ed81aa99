//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Driver / Adapter ──▶ Port trait ──▶ Rig subsystems (domain)
//! ```
//!
//! Drivers (shift register, HX711, LED strip, ADC) and storage adapters
//! implement these traits.  The subsystems in [`crate::app`] consume them via
//! generics, and a [`Board`] names one concrete type per port so the command
//! layer can be written once for real hardware and for test doubles.

use smart_leds::RGB8;

use crate::error::{ActuatorError, SensorError, StorageError};

// ───────────────────────────────────────────────────────────────
// Shift register port (domain → relay hardware)
// ───────────────────────────────────────────────────────────────

/// A chain of serial-in/parallel-out registers, addressed bit by bit.
///
/// Write-only: there is no way to read back what the outputs are driving.
pub trait ShiftRegisterPort {
    /// Number of output bits across the whole chain (`modules * 8`).
    fn output_count(&self) -> usize;

    /// Drive one output to `high` and latch it.
    fn set(&mut self, index: usize, high: bool) -> Result<(), ActuatorError>;

    /// Drive every output to `high` in a single shift + latch.
    fn set_all(&mut self, high: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Load cell port (weight amplifier → domain)
// ───────────────────────────────────────────────────────────────

/// Raw access to a load-cell amplifier.
pub trait LoadCellPort {
    /// Average `samples` raw conversions.
    ///
    /// Each conversion waits at most `timeout_ms` for data-ready; if any
    /// wait expires the whole read fails with [`SensorError::NotReady`].
    fn read_average(&mut self, samples: u8, timeout_ms: u32) -> Result<i32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// EEPROM port (domain ↔ non-volatile bytes)
// ───────────────────────────────────────────────────────────────

/// Byte-addressed non-volatile storage.
///
/// Never-written bytes read back as `0xFF`, like an erased EEPROM cell.
pub trait EepromPort {
    /// Total addressable bytes.
    fn capacity(&self) -> usize;

    /// Fill `buf` with the bytes starting at `address`.
    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `address` and make it durable.
    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Analog ports (ADC → domain)
// ───────────────────────────────────────────────────────────────

/// One ADC channel returning raw counts (12-bit on the ESP32-S3).
pub trait AdcPort {
    fn read_raw(&mut self) -> Result<u16, SensorError>;
}

/// Anything that can report a temperature in degrees Celsius.
pub trait TemperaturePort {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Pixel port (domain → LED strip)
// ───────────────────────────────────────────────────────────────

/// Pushes a full frame to an addressable LED strip.
pub trait PixelPort {
    /// Show `pixels` scaled by the global `brightness` (0-255).
    fn show(&mut self, pixels: &[RGB8], brightness: u8) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Board (one concrete type per port)
// ───────────────────────────────────────────────────────────────

/// Binds every port to a concrete implementation.
///
/// The firmware binary uses ESP32 drivers; integration tests plug in
/// recording mocks.  [`Rig`](super::service::Rig) and the command handlers
/// are generic over this trait only.
pub trait Board {
    type Register: ShiftRegisterPort;
    type LoadCell: LoadCellPort;
    type Eeprom: EepromPort;
    type Thermometer: TemperaturePort;
    type Pixels: PixelPort;
}
