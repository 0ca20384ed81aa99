//! Emulated EEPROM adapter.
//!
//! Implements [`EepromPort`] as a fixed 512-byte image that starts out
//! erased (`0xFF`).
//!
//! - **`target_os = "espidf"`**: the image is mirrored into a single NVS
//!   blob (`rigctl::eeprom`) and committed on every changing write.  NVS
//!   commits are atomic, so a power cut leaves either the old or the new
//!   image, never a torn one.
//! - **`not(target_os = "espidf")`**: the image lives in memory only.

use log::info;

use crate::app::ports::EepromPort;
use crate::error::StorageError;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspNvs, EspNvsPartition, NvsDefault};

/// Size of the emulated EEPROM in bytes.
pub const EEPROM_SIZE: usize = 512;

#[cfg(target_os = "espidf")]
const NAMESPACE: &str = "rigctl";
#[cfg(target_os = "espidf")]
const BLOB_KEY: &str = "eeprom";

pub struct EmulatedEeprom {
    image: [u8; EEPROM_SIZE],
    #[cfg(target_os = "espidf")]
    nvs: EspNvs<NvsDefault>,
}

impl EmulatedEeprom {
    /// Open the NVS namespace and load the stored image, if any.
    #[cfg(target_os = "espidf")]
    pub fn new(partition: EspNvsPartition<NvsDefault>) -> Result<Self, StorageError> {
        let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|_| StorageError::IoError)?;

        let mut image = [0xFF; EEPROM_SIZE];
        let mut buf = [0u8; EEPROM_SIZE];
        match nvs.get_blob(BLOB_KEY, &mut buf) {
            Ok(Some(stored)) if stored.len() == EEPROM_SIZE => {
                image.copy_from_slice(stored);
                info!("EmulatedEeprom: loaded {} bytes from NVS", EEPROM_SIZE);
            }
            Ok(Some(stored)) => log::warn!(
                "EmulatedEeprom: stored image has {} bytes, starting erased",
                stored.len()
            ),
            Ok(None) => info!("EmulatedEeprom: no stored image, starting erased"),
            Err(e) => log::warn!("EmulatedEeprom: NVS read failed ({:?}), starting erased", e),
        }

        Ok(Self { image, nvs })
    }

    /// A freshly erased in-memory image.
    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        info!("EmulatedEeprom: simulation backend ({} bytes)", EEPROM_SIZE);
        Self::from_image([0xFF; EEPROM_SIZE])
    }

    /// Start from a previously captured image (simulates a reboot).
    #[cfg(not(target_os = "espidf"))]
    pub fn from_image(image: [u8; EEPROM_SIZE]) -> Self {
        Self { image }
    }

    pub fn image(&self) -> &[u8; EEPROM_SIZE] {
        &self.image
    }

    #[cfg(target_os = "espidf")]
    fn commit(&mut self) -> Result<(), StorageError> {
        self.nvs.set_blob(BLOB_KEY, &self.image).map_err(|e| {
            log::warn!("EmulatedEeprom: NVS commit failed: {:?}", e);
            StorageError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn commit(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for EmulatedEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl EepromPort for EmulatedEeprom {
    fn capacity(&self) -> usize {
        EEPROM_SIZE
    }

    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        let end = address.checked_add(buf.len()).ok_or(StorageError::OutOfBounds)?;
        let src = self.image.get(address..end).ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = address.checked_add(data.len()).ok_or(StorageError::OutOfBounds)?;
        let dst = self.image.get_mut(address..end).ok_or(StorageError::OutOfBounds)?;
        if *dst == *data {
            return Ok(());
        }
        dst.copy_from_slice(data);
        self.commit()
    }
}
