//! Load-cell controller: tare, calibrate-to-known-weight and read.
//!
//! ```text
//!   raw counts ──(- offset)──▶ net counts ──(÷ factor)──▶ weight
//! ```
//!
//! The zero offset comes from [`Scale::tare`]; the factor comes from the
//! [`CalibrationStore`] at startup and from [`Scale::calibrate`] afterwards.
//! No ordering is enforced: reading before taring simply returns an
//! un-zeroed weight.

use log::{info, warn};

use crate::config::RigConfig;
use crate::error::{Error, ProtocolError, Result, Sensor, SensorError};

use super::calibration::CalibrationStore;
use super::ports::{EepromPort, LoadCellPort};

/// Sampling parameters taken from [`RigConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ScaleSettings {
    pub read_samples: u8,
    pub tare_samples: u8,
    pub calibration_samples: u8,
    pub ready_timeout_ms: u32,
}

impl From<&RigConfig> for ScaleSettings {
    fn from(config: &RigConfig) -> Self {
        Self {
            read_samples: config.scale_read_samples,
            tare_samples: config.tare_samples,
            calibration_samples: config.calibration_samples,
            ready_timeout_ms: config.sensor_ready_timeout_ms,
        }
    }
}

pub struct Scale<L: LoadCellPort, E: EepromPort> {
    cell: L,
    store: CalibrationStore<E>,
    settings: ScaleSettings,
    offset: i32,
    factor: f32,
}

impl<L: LoadCellPort, E: EepromPort> Scale<L, E> {
    /// Startup sequence: load the persisted factor (or the default), then tare.
    pub fn begin(cell: L, store: CalibrationStore<E>, settings: ScaleSettings) -> Self {
        let factor = store.load_scale();
        let mut scale = Self {
            cell,
            store,
            settings,
            offset: 0,
            factor,
        };
        scale.tare();
        info!(
            "Scale: ready (factor={}, offset={})",
            scale.factor, scale.offset
        );
        scale
    }

    /// Weight in calibrated units.
    pub fn read(&mut self) -> Result<f32> {
        let raw = self.sample(self.settings.read_samples)?;
        Ok(self.net(raw) as f32 / self.factor)
    }

    /// Make the current load the new zero.  Never fails: if the sensor does
    /// not answer, the previous offset is kept.
    pub fn tare(&mut self) {
        match self.sample(self.settings.tare_samples) {
            Ok(raw) => {
                self.offset = raw;
                info!("Scale: tared, offset={}", raw);
            }
            Err(e) => warn!("Scale: tare skipped, keeping offset {} ({})", self.offset, e),
        }
    }

    /// Derive a new factor from a known weight currently on the cell, apply
    /// it, and persist it.
    ///
    /// The in-memory factor is updated before the store is written, so a
    /// persistence failure still leaves the new calibration active for this
    /// session.
    pub fn calibrate(&mut self, known_weight: f32) -> Result<f32> {
        if !known_weight.is_finite() || known_weight <= 0.0 {
            return Err(ProtocolError::InvalidArgument("weight").into());
        }
        let raw = self.sample(self.settings.calibration_samples)?;
        let factor = self.net(raw) as f32 / known_weight;
        if !factor.is_finite() || factor == 0.0 {
            return Err(Error::Sensor(Sensor::Scale, SensorError::OutOfRange));
        }

        self.factor = factor;
        info!("Scale: calibrated to factor {} ({} units)", factor, known_weight);

        self.store.save_scale(factor).map_err(|e| {
            warn!("Scale: calibration not persisted: {}", e);
            Error::Persistence(e)
        })?;
        Ok(factor)
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn store(&self) -> &CalibrationStore<E> {
        &self.store
    }

    fn sample(&mut self, samples: u8) -> Result<i32> {
        self.cell
            .read_average(samples.max(1), self.settings.ready_timeout_ms)
            .map_err(|e| Error::Sensor(Sensor::Scale, e))
    }

    fn net(&self, raw: i32) -> i64 {
        i64::from(raw) - i64::from(self.offset)
    }
}
