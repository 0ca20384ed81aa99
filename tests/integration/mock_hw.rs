//! Mock hardware for integration tests.
//!
//! Records every register and pixel write so tests can assert on the full
//! command history without touching real GPIO.  Sensor values are shared
//! through `Rc` handles so a test can change what the "hardware" reports
//! after the [`Rig`] has taken ownership of the mocks.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use rigctl::adapters::eeprom::EmulatedEeprom;
use rigctl::app::ports::{
    Board, EepromPort, LoadCellPort, PixelPort, ShiftRegisterPort, TemperaturePort,
};
use rigctl::app::service::{BoardParts, Rig};
use rigctl::cli::engine::CommandEngine;
use rigctl::cli::transport::Transport;
use rigctl::config::RigConfig;
use rigctl::error::{ActuatorError, SensorError, StorageError};
use smart_leds::RGB8;

// ── Shift register ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterCall {
    Set(usize, bool),
    SetAll(bool),
}

pub struct MockRegister {
    pub bits: Vec<bool>,
    pub calls: Vec<RegisterCall>,
    pub fail: bool,
}

impl MockRegister {
    /// `modules` chained registers, outputs in power-on garbage (high).
    pub fn new(modules: usize) -> Self {
        Self {
            bits: vec![true; modules * 8],
            calls: Vec::new(),
            fail: false,
        }
    }
}

impl ShiftRegisterPort for MockRegister {
    fn output_count(&self) -> usize {
        self.bits.len()
    }

    fn set(&mut self, index: usize, high: bool) -> Result<(), ActuatorError> {
        if self.fail {
            return Err(ActuatorError::RelayWriteFailed);
        }
        self.bits[index] = high;
        self.calls.push(RegisterCall::Set(index, high));
        Ok(())
    }

    fn set_all(&mut self, high: bool) -> Result<(), ActuatorError> {
        if self.fail {
            return Err(ActuatorError::RelayWriteFailed);
        }
        self.bits.iter_mut().for_each(|b| *b = high);
        self.calls.push(RegisterCall::SetAll(high));
        Ok(())
    }
}

// ── Load cell ─────────────────────────────────────────────────

/// Raw counts the fake amplifier reports; `None` = never ready.
pub type RawHandle = Rc<Cell<Option<i32>>>;

pub struct FakeLoadCell {
    pub raw: RawHandle,
    pub requests: Rc<RefCell<Vec<(u8, u32)>>>,
}

impl LoadCellPort for FakeLoadCell {
    fn read_average(&mut self, samples: u8, timeout_ms: u32) -> Result<i32, SensorError> {
        self.requests.borrow_mut().push((samples, timeout_ms));
        self.raw.get().ok_or(SensorError::NotReady)
    }
}

// ── EEPROM ────────────────────────────────────────────────────

/// The host emulated EEPROM, with an injectable write failure.
pub struct MockEeprom {
    pub inner: EmulatedEeprom,
    pub fail_writes: bool,
}

impl EepromPort for MockEeprom {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn read(&self, address: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.inner.read(address, buf)
    }

    fn write(&mut self, address: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.inner.write(address, data)
    }
}

// ── Thermometer ───────────────────────────────────────────────

pub type TempHandle = Rc<Cell<Result<f32, SensorError>>>;

pub struct FakeThermometer(pub TempHandle);

impl TemperaturePort for FakeThermometer {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        self.0.get()
    }
}

// ── Pixels ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPixels {
    /// (first pixel colour, brightness, pixel count) per push.
    pub frames: Vec<(RGB8, u8, usize)>,
}

impl RecordingPixels {
    pub fn last(&self) -> Option<(RGB8, u8)> {
        self.frames.last().map(|&(c, b, _)| (c, b))
    }
}

impl PixelPort for RecordingPixels {
    fn show(&mut self, pixels: &[RGB8], brightness: u8) -> Result<(), ActuatorError> {
        let first = pixels.first().copied().unwrap_or_default();
        self.frames.push((first, brightness, pixels.len()));
        Ok(())
    }
}

// ── Board ─────────────────────────────────────────────────────

pub struct MockBoard;

impl Board for MockBoard {
    type Register = MockRegister;
    type LoadCell = FakeLoadCell;
    type Eeprom = MockEeprom;
    type Thermometer = FakeThermometer;
    type Pixels = RecordingPixels;
}

/// A rig on mock hardware plus the handles that steer it.
pub struct TestRig {
    pub rig: Rig<MockBoard>,
    pub engine: CommandEngine<MockBoard>,
    pub raw: RawHandle,
    pub temp: TempHandle,
    pub requests: Rc<RefCell<Vec<(u8, u32)>>>,
}

pub struct RigBuilder {
    pub config: RigConfig,
    pub modules: usize,
    pub raw: Option<i32>,
    pub eeprom: EmulatedEeprom,
    pub fail_writes: bool,
}

impl Default for RigBuilder {
    fn default() -> Self {
        Self {
            config: RigConfig::default(),
            modules: 4,
            raw: Some(0),
            eeprom: EmulatedEeprom::new(),
            fail_writes: false,
        }
    }
}

impl RigBuilder {
    pub fn build(self) -> TestRig {
        let raw: RawHandle = Rc::new(Cell::new(self.raw));
        let temp: TempHandle = Rc::new(Cell::new(Ok(21.5)));
        let requests = Rc::new(RefCell::new(Vec::new()));

        let rig = Rig::new(
            &self.config,
            BoardParts {
                register: MockRegister::new(self.modules),
                load_cell: FakeLoadCell {
                    raw: raw.clone(),
                    requests: requests.clone(),
                },
                eeprom: MockEeprom {
                    inner: self.eeprom,
                    fail_writes: self.fail_writes,
                },
                thermometer: FakeThermometer(temp.clone()),
                pixels: RecordingPixels::default(),
            },
        );
        let engine = CommandEngine::new(&self.config);

        TestRig {
            rig,
            engine,
            raw,
            temp,
            requests,
        }
    }
}

impl TestRig {
    pub fn new() -> Self {
        RigBuilder::default().build()
    }

    /// Feed `input` and return everything written back, as text.
    pub fn send(&mut self, input: &str) -> String {
        let mut out = String::new();
        self.engine
            .feed(input.as_bytes(), &mut self.rig, |reply| out.push_str(reply));
        out
    }

    pub fn relay_bits(&self) -> &[bool] {
        &self.rig.relays.register().bits
    }

    pub fn register_calls(&self) -> &[RegisterCall] {
        &self.rig.relays.register().calls
    }

    pub fn frames(&self) -> &[(RGB8, u8, usize)] {
        &self.rig.pixels.port().frames
    }
}

// ── Transport ─────────────────────────────────────────────────

/// In-memory serial line: tests push bytes into `rx`, replies land in `tx`.
#[derive(Default)]
pub struct LoopbackTransport {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    /// Largest read the "UART" returns at once.
    pub max_read: usize,
    pub flushes: usize,
}

impl LoopbackTransport {
    pub fn with_input(input: &[u8], max_read: usize) -> Self {
        Self {
            rx: input.iter().copied().collect(),
            max_read,
            ..Self::default()
        }
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }
}

impl Transport for LoopbackTransport {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.max_read.max(1)).min(self.rx.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or_default();
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        self.flushes += 1;
        Ok(())
    }
}
