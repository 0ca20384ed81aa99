//! LED strip adapter.
//!
//! [`LedStrip`] implements [`PixelPort`] on top of any `smart-leds`
//! writer, applying the global brightness with `smart_leds::brightness`
//! on the way out.
//!
//! - **`target_os = "espidf"`**: [`RmtWs2812`] clocks WS2812B frames out
//!   of an RMT TX channel (GRB order, 800 kHz).
//! - **host**: tests plug in any recording `SmartLedsWrite`.

use smart_leds::{RGB8, SmartLedsWrite, brightness};

use crate::app::ports::PixelPort;
use crate::error::ActuatorError;

pub struct LedStrip<W> {
    writer: W,
}

impl<W> LedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W> PixelPort for LedStrip<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    fn show(&mut self, pixels: &[RGB8], level: u8) -> Result<(), ActuatorError> {
        self.writer
            .write(brightness(pixels.iter().copied(), level))
            .map_err(|_| ActuatorError::LightWriteFailed)
    }
}

// ── ESP32 RMT backend ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::RmtWs2812;

#[cfg(target_os = "espidf")]
mod esp {
    use core::time::Duration;

    use esp_idf_hal::gpio::OutputPin;
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_hal::rmt::config::TransmitConfig;
    use esp_idf_hal::rmt::{PinState, Pulse, RmtChannel, TxRmtDriver, VariableLengthSignal};
    use esp_idf_svc::sys::EspError;
    use smart_leds::{RGB8, SmartLedsWrite};

    /// WS2812B writer on one RMT channel.
    pub struct RmtWs2812<'d> {
        tx: TxRmtDriver<'d>,
        /// (high, low) pulse pairs for a 0 bit and a 1 bit.
        zero: (Pulse, Pulse),
        one: (Pulse, Pulse),
    }

    impl<'d> RmtWs2812<'d> {
        pub fn new<C: RmtChannel>(
            channel: impl Peripheral<P = C> + 'd,
            pin: impl Peripheral<P = impl OutputPin> + 'd,
        ) -> Result<Self, EspError> {
            let config = TransmitConfig::new().clock_divider(1);
            let tx = TxRmtDriver::new(channel, pin, &config)?;
            let hz = tx.counter_clock()?;
            let zero = (
                Pulse::new_with_duration(hz, PinState::High, &Duration::from_nanos(350))?,
                Pulse::new_with_duration(hz, PinState::Low, &Duration::from_nanos(800))?,
            );
            let one = (
                Pulse::new_with_duration(hz, PinState::High, &Duration::from_nanos(700))?,
                Pulse::new_with_duration(hz, PinState::Low, &Duration::from_nanos(600))?,
            );
            Ok(Self { tx, zero, one })
        }
    }

    impl SmartLedsWrite for RmtWs2812<'_> {
        type Error = EspError;
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), EspError>
        where
            T: IntoIterator<Item = I>,
            I: Into<RGB8>,
        {
            let mut signal = VariableLengthSignal::new();
            for px in iterator {
                let px: RGB8 = px.into();
                let grb = (u32::from(px.g) << 16) | (u32::from(px.r) << 8) | u32::from(px.b);
                for bit in (0..24).rev() {
                    let (high, low) = if (grb >> bit) & 1 == 1 { &self.one } else { &self.zero };
                    signal.push([high, low])?;
                }
            }
            self.tx.start_blocking(&signal)
        }
    }
}
