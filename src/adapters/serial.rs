//! UART transport for the command line (ESP32 only).
//!
//! The protocol runs on UART1 so the ESP-IDF log console keeps UART0 /
//! USB-CDC to itself.  Reads never block; the main loop polls.

use esp_idf_hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_hal::gpio::{AnyIOPin, InputPin, OutputPin};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::uart::{Uart, UartDriver, config::Config};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::EspError;
use log::info;

use crate::cli::transport::Transport;

pub struct UartTransport<'d> {
    uart: UartDriver<'d>,
}

impl<'d> UartTransport<'d> {
    pub fn new<U: Uart>(
        uart: impl Peripheral<P = U> + 'd,
        tx: impl Peripheral<P = impl OutputPin> + 'd,
        rx: impl Peripheral<P = impl InputPin> + 'd,
        baud_rate: u32,
    ) -> Result<Self, EspError> {
        let config = Config::default().baudrate(Hertz(baud_rate));
        let uart = UartDriver::new(
            uart,
            tx,
            rx,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &config,
        )?;
        info!("UartTransport: {} baud", baud_rate);
        Ok(Self { uart })
    }
}

impl Transport for UartTransport<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        self.uart.read(buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        self.uart.write(data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.uart.wait_tx_done(BLOCK)
    }
}
