//! Rigctl Firmware: Main Entry Point
//!
//! Single-threaded cooperative loop: drain the command UART, then give the
//! LED animation its frame tick.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ShiftRegister74hc595   Hx711        EmulatedEeprom (NVS)      │
//! │  TemperatureSensor      LedStrip     UartTransport             │
//! │  (OneshotAdc)           (RmtWs2812)  MonotonicClock            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        Rig (pure logic)  ◀──  CommandEngine            │    │
//! │  │  RelayBank · Scale · PixelAnimation                    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Gpio9, Input, Output, PinDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::info;

use rigctl::adapters::adc::OneshotAdc;
use rigctl::adapters::eeprom::EmulatedEeprom;
use rigctl::adapters::led_strip::{LedStrip, RmtWs2812};
use rigctl::adapters::serial::UartTransport;
use rigctl::adapters::time::MonotonicClock;
use rigctl::app::ports::Board;
use rigctl::app::service::{BoardParts, Rig};
use rigctl::cli::engine::CommandEngine;
use rigctl::config::RigConfig;
use rigctl::drivers::hx711::Hx711;
use rigctl::drivers::shift_register::ShiftRegister74hc595;
use rigctl::pins;
use rigctl::sensors::temperature::TemperatureSensor;

// ── Board binding ─────────────────────────────────────────────

type OutPin = PinDriver<'static, AnyOutputPin, Output>;
type InPin = PinDriver<'static, AnyInputPin, Input>;

/// ESP32-S3 rig controller board.
struct EspBoard;

impl Board for EspBoard {
    type Register = ShiftRegister74hc595<OutPin, OutPin, OutPin, { pins::SHIFT_REGISTER_COUNT }>;
    type LoadCell = Hx711<InPin, OutPin, Ets>;
    type Eeprom = EmulatedEeprom;
    type Thermometer = TemperatureSensor<OneshotAdc<'static, Gpio9, AdcDriver<'static, ADC1>>>;
    type Pixels = LedStrip<RmtWs2812<'static>>;
}

// The peripheral fields taken in `main` must match the pin map.
const _: () = {
    assert!(pins::SHIFT_REGISTER_DATA_GPIO == 6);
    assert!(pins::SHIFT_REGISTER_CLOCK_GPIO == 7);
    assert!(pins::SHIFT_REGISTER_LATCH_GPIO == 8);
    assert!(pins::SCALE_DATA_GPIO == 2);
    assert!(pins::SCALE_CLOCK_GPIO == 3);
    assert!(pins::LED_DATA_GPIO == 4);
    assert!(pins::TEMP_ADC_GPIO == 9);
    assert!(pins::UART_TX_GPIO == 17);
    assert!(pins::UART_RX_GPIO == 18);
};

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Rigctl v{}                          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = RigConfig::default();
    config.validate()?;

    // ── 2. Peripherals (checked against `pins` above) ─────────
    let p = Peripherals::take()?;

    let register = ShiftRegister74hc595::new(
        PinDriver::output(p.pins.gpio6.downgrade_output())?,
        PinDriver::output(p.pins.gpio7.downgrade_output())?,
        PinDriver::output(p.pins.gpio8.downgrade_output())?,
    );

    let load_cell = Hx711::new(
        PinDriver::input(p.pins.gpio2.downgrade_input())?,
        PinDriver::output(p.pins.gpio3.downgrade_output())?,
        Ets,
    )?;

    let eeprom = EmulatedEeprom::new(EspDefaultNvsPartition::take()?)?;

    let adc = AdcDriver::new(p.adc1)?;
    let channel = AdcChannelDriver::new(
        adc,
        p.pins.gpio9,
        &AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        },
    )?;
    let thermometer = TemperatureSensor::new(OneshotAdc::new(channel));

    let pixels = LedStrip::new(RmtWs2812::new(p.rmt.channel0, p.pins.gpio4)?);

    let mut uart = UartTransport::new(
        p.uart1,
        p.pins.gpio17,
        p.pins.gpio18,
        config.baud_rate,
    )?;

    info!(
        "Pins: relays DS/SH/ST={}/{}/{}, HX711 DOUT/SCK={}/{}, LED={}, NTC={}, UART TX/RX={}/{}",
        pins::SHIFT_REGISTER_DATA_GPIO,
        pins::SHIFT_REGISTER_CLOCK_GPIO,
        pins::SHIFT_REGISTER_LATCH_GPIO,
        pins::SCALE_DATA_GPIO,
        pins::SCALE_CLOCK_GPIO,
        pins::LED_DATA_GPIO,
        pins::TEMP_ADC_GPIO,
        pins::UART_TX_GPIO,
        pins::UART_RX_GPIO,
    );

    // ── 3. Startup sequence ───────────────────────────────────
    let mut rig: Rig<EspBoard> = Rig::new(
        &config,
        BoardParts {
            register,
            load_cell,
            eeprom,
            thermometer,
            pixels,
        },
    );
    let mut engine = CommandEngine::new(&config);
    let clock = MonotonicClock::new();

    info!("Entering main loop");

    // ── 4. Main loop ──────────────────────────────────────────
    loop {
        engine.poll(&mut uart, &mut rig);
        rig.tick(clock.uptime_ms());
        FreeRtos::delay_ms(1);
    }
}
