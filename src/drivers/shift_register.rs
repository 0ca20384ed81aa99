//! 74HC595 shift-register chain driver.
//!
//! `N` registers are daisy-chained (Q7' → DS of the next chip), giving
//! `N * 8` outputs.  Output `i` is bit `i % 8` of register `i / 8`, where
//! register 0 is the one wired to the MCU.
//!
//! ```text
//!   MCU DS ──▶ [reg 0] ──Q7'──▶ [reg 1] ──Q7'──▶ ... [reg N-1]
//!   SH_CP ───────┴──────────────────┴───────────────────┘
//!   ST_CP ───────┴──────────────────┴───────────────────┘
//! ```
//!
//! Every write shifts the full shadow image out, last register first and
//! MSB first, then pulses the latch so all outputs change together.  A
//! failed shift restores the previous image, so the shadow never holds a
//! change that was not latched.

use embedded_hal::digital::OutputPin;

use crate::app::ports::ShiftRegisterPort;
use crate::error::ActuatorError;

pub struct ShiftRegister74hc595<DS, SH, ST, const N: usize> {
    data: DS,
    clock: SH,
    latch: ST,
    image: [u8; N],
}

impl<DS, SH, ST, const N: usize> ShiftRegister74hc595<DS, SH, ST, N>
where
    DS: OutputPin,
    SH: OutputPin,
    ST: OutputPin,
{
    /// Take the three pins.  Nothing is shifted until the first write.
    pub fn new(data: DS, clock: SH, latch: ST) -> Self {
        Self {
            data,
            clock,
            latch,
            image: [0; N],
        }
    }

    /// Last image shifted out, one byte per register.
    pub fn image(&self) -> &[u8; N] {
        &self.image
    }

    fn shift_out(&mut self) -> Result<(), ActuatorError> {
        self.latch.set_low().map_err(|_| ActuatorError::RelayWriteFailed)?;

        for byte in self.image.iter().rev() {
            for bit in (0..8).rev() {
                self.data
                    .set_state(((byte >> bit) & 1 == 1).into())
                    .map_err(|_| ActuatorError::RelayWriteFailed)?;
                self.clock.set_high().map_err(|_| ActuatorError::RelayWriteFailed)?;
                self.clock.set_low().map_err(|_| ActuatorError::RelayWriteFailed)?;
            }
        }

        self.latch.set_high().map_err(|_| ActuatorError::RelayWriteFailed)
    }
}

impl<DS, SH, ST, const N: usize> ShiftRegisterPort for ShiftRegister74hc595<DS, SH, ST, N>
where
    DS: OutputPin,
    SH: OutputPin,
    ST: OutputPin,
{
    fn output_count(&self) -> usize {
        N * 8
    }

    fn set(&mut self, index: usize, high: bool) -> Result<(), ActuatorError> {
        let Some(byte) = self.image.get_mut(index / 8) else {
            return Err(ActuatorError::RelayWriteFailed);
        };
        let previous = *byte;
        let mask = 1u8 << (index % 8);
        if high {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.shift_out().inspect_err(|_| self.image[index / 8] = previous)
    }

    fn set_all(&mut self, high: bool) -> Result<(), ActuatorError> {
        let previous = self.image;
        self.image = [if high { 0xFF } else { 0x00 }; N];
        self.shift_out().inspect_err(|_| self.image = previous)
    }
}
