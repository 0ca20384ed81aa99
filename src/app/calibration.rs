//! Calibration store: one `f32` scale factor at a fixed EEPROM offset.
//!
//! The record is 4 bytes, always little-endian regardless of the CPU, so an
//! image written by one build reads back identically on another.  An erased
//! cell (`FF FF FF FF`) decodes to NaN, which is how "never calibrated" is
//! detected.

use log::{info, warn};

use crate::config::DEFAULT_SCALE;
use crate::error::StorageError;

use super::ports::EepromPort;

/// Width of the persisted record in bytes.
pub const RECORD_LEN: usize = 4;

/// Encode a float as its little-endian IEEE-754 bytes.
pub fn encode_f32(value: f32) -> [u8; RECORD_LEN] {
    value.to_bits().to_le_bytes()
}

/// Decode little-endian IEEE-754 bytes; the exact bit pattern is preserved.
pub fn decode_f32(bytes: [u8; RECORD_LEN]) -> f32 {
    f32::from_bits(u32::from_le_bytes(bytes))
}

pub struct CalibrationStore<E: EepromPort> {
    eeprom: E,
    address: usize,
    default_scale: f32,
}

impl<E: EepromPort> CalibrationStore<E> {
    pub fn new(eeprom: E, address: usize) -> Self {
        Self::with_default(eeprom, address, DEFAULT_SCALE)
    }

    pub fn with_default(eeprom: E, address: usize, default_scale: f32) -> Self {
        Self {
            eeprom,
            address,
            default_scale,
        }
    }

    /// Read the raw float at `address` (may be NaN for erased storage).
    pub fn read_float(&self, address: usize) -> Result<f32, StorageError> {
        let mut buf = [0u8; RECORD_LEN];
        self.eeprom.read(address, &mut buf)?;
        Ok(decode_f32(buf))
    }

    /// Write a float at `address`, then read it back and compare bit-for-bit.
    pub fn write_float(&mut self, address: usize, value: f32) -> Result<(), StorageError> {
        let bytes = encode_f32(value);
        self.eeprom.write(address, &bytes)?;

        let mut check = [0u8; RECORD_LEN];
        self.eeprom.read(address, &mut check)?;
        if check != bytes {
            return Err(StorageError::VerifyFailed);
        }
        Ok(())
    }

    /// Load the persisted scale factor, substituting the default when the
    /// record is unreadable, NaN, infinite or zero.
    pub fn load_scale(&self) -> f32 {
        match self.read_float(self.address) {
            Ok(scale) if scale.is_finite() && scale != 0.0 => {
                info!("CalibrationStore: loaded scale {}", scale);
                scale
            }
            Ok(scale) => {
                info!(
                    "CalibrationStore: stored scale {} unusable, using default {}",
                    scale, self.default_scale
                );
                self.default_scale
            }
            Err(e) => {
                warn!(
                    "CalibrationStore: read failed ({}), using default {}",
                    e, self.default_scale
                );
                self.default_scale
            }
        }
    }

    /// Persist a new scale factor at the configured address.
    pub fn save_scale(&mut self, scale: f32) -> Result<(), StorageError> {
        self.write_float(self.address, scale)
    }

    pub fn address(&self) -> usize {
        self.address
    }

    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }
}
