//! Built-in command handlers.
//!
//! | Command            | Arguments                                   |
//! |--------------------|---------------------------------------------|
//! | `handshake`        | -                                           |
//! | `set_relay`        | `open\|close <id>` (255 = all)               |
//! | `get_sensor`       | `scale\|temperature`                         |
//! | `calibrate_sensor` | `scale tare` / `scale weight <w>`           |
//! | `set_light`        | `color <r> <g> <b>` / `intensity <v>` / `transition <ms>` |
//!
//! Every handler parses all of its arguments before touching the rig, so a
//! rejected request never leaves a partial change behind.

use smart_leds::RGB8;

use crate::app::ports::{Board, TemperaturePort};
use crate::app::relays::BROADCAST_RELAY;
use crate::app::service::Rig;
use crate::error::{Error, ProtocolError, Result, Sensor};

use super::args::{Args, Reply};
use super::engine::CommandHandler;

fn invalid(what: &'static str) -> Error {
    ProtocolError::InvalidArgument(what).into()
}

/// Liveness probe.
pub struct Handshake;

impl<B: Board> CommandHandler<B> for Handshake {
    fn execute(&self, _rig: &mut Rig<B>, _args: &mut Args<'_>) -> Result<Reply> {
        Ok(Reply::Text(":)"))
    }
}

pub struct SetRelay;

impl<B: Board> CommandHandler<B> for SetRelay {
    fn execute(&self, rig: &mut Rig<B>, args: &mut Args<'_>) -> Result<Reply> {
        let closed = match args.next_required("action")? {
            "open" => false,
            "close" => true,
            _ => return Err(invalid("action")),
        };
        let id: u8 = args.next_parsed("relay id")?;

        if id == BROADCAST_RELAY {
            rig.relays.set_all(closed)?;
        } else {
            rig.relays.set_relay(id, closed)?;
        }
        Ok(Reply::Done)
    }
}

pub struct GetSensor;

impl<B: Board> CommandHandler<B> for GetSensor {
    fn execute(&self, rig: &mut Rig<B>, args: &mut Args<'_>) -> Result<Reply> {
        match args.next_required("sensor")? {
            "scale" => Ok(Reply::Value(rig.scale.read()?)),
            "temperature" => rig
                .thermometer
                .read_celsius()
                .map(Reply::Value)
                .map_err(|e| Error::Sensor(Sensor::Temperature, e)),
            _ => Err(invalid("sensor")),
        }
    }
}

pub struct CalibrateSensor;

impl<B: Board> CommandHandler<B> for CalibrateSensor {
    fn execute(&self, rig: &mut Rig<B>, args: &mut Args<'_>) -> Result<Reply> {
        if args.next_required("sensor")? != "scale" {
            return Err(invalid("sensor"));
        }
        match args.next_required("calibration")? {
            "tare" => rig.scale.tare(),
            "weight" => {
                let weight: f32 = args.next_parsed("weight")?;
                rig.scale.calibrate(weight)?;
            }
            _ => return Err(invalid("calibration")),
        }
        Ok(Reply::Done)
    }
}

pub struct SetLight;

impl<B: Board> CommandHandler<B> for SetLight {
    fn execute(&self, rig: &mut Rig<B>, args: &mut Args<'_>) -> Result<Reply> {
        match args.next_required("action")? {
            "color" => {
                let r = args.next_parsed("red value")?;
                let g = args.next_parsed("green value")?;
                let b = args.next_parsed("blue value")?;
                rig.pixels.set_base_color(RGB8::new(r, g, b));
            }
            "intensity" => {
                let value = args.next_parsed("intensity")?;
                rig.pixels.set_brightness(value);
            }
            "transition" => {
                let ms = args.next_parsed("transition time")?;
                rig.pixels.set_transition_time(ms);
            }
            _ => return Err(invalid("action")),
        }
        Ok(Reply::Done)
    }
}
