//! One-shot ADC channel (ESP32 only).

use core::borrow::Borrow;

use esp_idf_hal::adc::ADCPin;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};

use crate::app::ports::AdcPort;
use crate::error::SensorError;

pub struct OneshotAdc<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    channel: AdcChannelDriver<'d, T, M>,
}

impl<'d, T, M> OneshotAdc<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    pub fn new(channel: AdcChannelDriver<'d, T, M>) -> Self {
        Self { channel }
    }
}

impl<'d, T, M> AdcPort for OneshotAdc<'d, T, M>
where
    T: ADCPin,
    M: Borrow<AdcDriver<'d, T::Adc>>,
{
    fn read_raw(&mut self) -> Result<u16, SensorError> {
        self.channel.read().map_err(|e| {
            log::warn!("OneshotAdc: read failed: {:?}", e);
            SensorError::AdcReadFailed
        })
    }
}
