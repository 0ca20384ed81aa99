//! HX711 24-bit load-cell amplifier driver.
//!
//! Bit-banged two-wire interface:
//!
//! ```text
//!   DOUT ‾‾‾‾\____[b23][b22] ... [b0]‾‾‾‾‾‾‾
//!   PD_SCK ______/‾\_/‾\_ ... _/‾\_/‾\_______   (24 data + 1..3 gain pulses)
//!              ▲ ready (DOUT low)
//! ```
//!
//! DOUT going low signals a finished conversion.  Each rising clock edge
//! presents the next bit, MSB first.  The 1-3 extra pulses after bit 0
//! select the channel and gain for the *next* conversion.  PD_SCK held high
//! for more than 60 µs powers the chip down, so the clock is always
//! returned low between pulses.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::LoadCellPort;
use crate::error::SensorError;

/// Channel / gain selection for the following conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gain {
    /// Channel A, gain 128.
    A128,
    /// Channel B, gain 32.
    B32,
    /// Channel A, gain 64.
    A64,
}

impl Gain {
    fn extra_pulses(self) -> u8 {
        match self {
            Self::A128 => 1,
            Self::B32 => 2,
            Self::A64 => 3,
        }
    }
}

pub struct Hx711<DOUT, SCK, D> {
    dout: DOUT,
    sck: SCK,
    delay: D,
    gain: Gain,
}

impl<DOUT, SCK, D> Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    /// Take the pins and power the chip up (clock low), channel A / 128.
    pub fn new(dout: DOUT, mut sck: SCK, delay: D) -> Result<Self, SensorError> {
        sck.set_low().map_err(|_| SensorError::PinFault)?;
        Ok(Self {
            dout,
            sck,
            delay,
            gain: Gain::A128,
        })
    }

    /// Takes effect after the next conversion is read.
    pub fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    pub fn gain(&self) -> Gain {
        self.gain
    }

    pub fn is_ready(&mut self) -> Result<bool, SensorError> {
        self.dout.is_low().map_err(|_| SensorError::PinFault)
    }

    /// Poll DOUT every millisecond for up to `timeout_ms`.
    pub fn wait_ready(&mut self, timeout_ms: u32) -> Result<(), SensorError> {
        for _ in 0..timeout_ms {
            if self.is_ready()? {
                return Ok(());
            }
            self.delay.delay_ms(1);
        }
        if self.is_ready()? {
            Ok(())
        } else {
            Err(SensorError::NotReady)
        }
    }

    /// One signed conversion, waiting at most `timeout_ms` for data-ready.
    pub fn read_raw(&mut self, timeout_ms: u32) -> Result<i32, SensorError> {
        self.wait_ready(timeout_ms)?;

        let mut value: u32 = 0;
        for _ in 0..24 {
            let bit = self.pulse()?;
            value = (value << 1) | u32::from(bit);
        }
        for _ in 0..self.gain.extra_pulses() {
            self.pulse()?;
        }

        // Sign-extend the 24-bit two's-complement result.
        Ok(((value << 8) as i32) >> 8)
    }

    /// One clock pulse; returns DOUT sampled while the clock is high.
    fn pulse(&mut self) -> Result<bool, SensorError> {
        self.sck.set_high().map_err(|_| SensorError::PinFault)?;
        self.delay.delay_us(1);
        let bit = self.dout.is_high().map_err(|_| SensorError::PinFault);
        self.sck.set_low().map_err(|_| SensorError::PinFault)?;
        self.delay.delay_us(1);
        bit
    }
}

impl<DOUT, SCK, D> LoadCellPort for Hx711<DOUT, SCK, D>
where
    DOUT: InputPin,
    SCK: OutputPin,
    D: DelayNs,
{
    fn read_average(&mut self, samples: u8, timeout_ms: u32) -> Result<i32, SensorError> {
        let samples = samples.max(1);
        let mut sum: i64 = 0;
        for _ in 0..samples {
            sum += i64::from(self.read_raw(timeout_ms)?);
        }
        Ok((sum / i64::from(samples)) as i32)
    }
}
