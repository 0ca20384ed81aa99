//! Unified error types for the rigctl firmware.
//!
//! Every command handler funnels its failures into [`Error`].  The
//! `Display` text of an [`Error`] is exactly what follows `ERROR ` on the
//! reply line, so these strings are part of the wire protocol and must stay
//! stable.

use core::fmt;

/// Longest command name echoed back in an "unrecognized command" reply.
pub const MAX_ECHOED_NAME: usize = 32;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible command path in the firmware funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request line itself was unusable (unknown command, bad argument).
    Protocol(ProtocolError),
    /// Relay index outside `[0, relay_count)` that is not the broadcast id.
    InvalidAddress(u8),
    /// A sensor could not be read or returned unusable data.
    Sensor(Sensor, SensorError),
    /// A driver failed to write to its output pins.
    Actuator(ActuatorError),
    /// The calibration record could not be made durable.
    Persistence(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "{e}"),
            Self::InvalidAddress(_) => write!(f, "Invalid relay id!"),
            Self::Sensor(Sensor::Scale, SensorError::NotReady) => write!(f, "Scale not ready!"),
            Self::Sensor(Sensor::Scale, SensorError::OutOfRange) => {
                write!(f, "Scale reading out of range!")
            }
            Self::Sensor(Sensor::Scale, _) => write!(f, "Scale fault!"),
            Self::Sensor(Sensor::Temperature, SensorError::OutOfRange) => {
                write!(f, "Temperature out of range!")
            }
            Self::Sensor(Sensor::Temperature, _) => write!(f, "Temperature sensor fault!"),
            Self::Actuator(e) => write!(f, "{e}"),
            Self::Persistence(_) => write!(f, "Calibration not persisted!"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Persistence(e)
    }
}

// ---------------------------------------------------------------------------
// Protocol errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No handler is registered under this name (truncated for the reply).
    UnrecognizedCommand(heapless::String<MAX_ECHOED_NAME>),
    /// A positional argument was absent.
    MissingArgument(&'static str),
    /// A positional argument was present but could not be used.
    InvalidArgument(&'static str),
}

impl ProtocolError {
    /// Build an unrecognized-command error, keeping as much of the name as fits.
    pub fn unrecognized(name: &str) -> Self {
        let mut echoed = heapless::String::new();
        for ch in name.chars() {
            if echoed.push(ch).is_err() {
                break;
            }
        }
        Self::UnrecognizedCommand(echoed)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCommand(name) => write!(f, "Unrecognized command [{name}]!"),
            Self::MissingArgument(what) => write!(f, "No {what} specified!"),
            Self::InvalidArgument(what) => write!(f, "Invalid {what}!"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Which sensor an error refers to; the reply wording depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Scale,
    Temperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Data-ready was not signalled within the bounded wait.
    NotReady,
    /// A GPIO read or clock write failed.
    PinFault,
    /// ADC read returned an error.
    AdcReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady => write!(f, "sensor not ready"),
            Self::PinFault => write!(f, "sensor pin fault"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Shift-register data/clock/latch pin write failed.
    RelayWriteFailed,
    /// LED strip transfer failed.
    LightWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RelayWriteFailed => write!(f, "Relay write failed!"),
            Self::LightWriteFailed => write!(f, "Light write failed!"),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from [`EepromPort`](crate::app::ports::EepromPort) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Address range falls outside the EEPROM image.
    OutOfBounds,
    /// Generic I/O error from the storage backend.
    IoError,
    /// Read-back after a write did not match what was written.
    VerifyFailed,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "address out of bounds"),
            Self::IoError => write!(f, "I/O error"),
            Self::VerifyFailed => write!(f, "read-back verification failed"),
        }
    }
}

impl std::error::Error for StorageError {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
