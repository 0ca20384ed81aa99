//! Rig: the explicitly owned bundle of every controllable subsystem.
//!
//! [`Rig`] replaces process-wide hardware singletons: it is built once at
//! startup from a [`Board`]'s concrete parts and handed by `&mut` to the
//! command dispatcher and to the frame tick.
//!
//! ```text
//!   CommandEngine ──▶ ┌──────────────────────────────┐
//!                     │             Rig              │
//!      main loop ───▶ │ relays · scale · thermometer │ ──▶ ports
//!      (tick)         │           · pixels           │
//!                     └──────────────────────────────┘
//! ```

use log::info;

use crate::config::RigConfig;

use super::calibration::CalibrationStore;
use super::pixels::PixelAnimation;
use super::ports::Board;
use super::relays::RelayBank;
use super::scale::{Scale, ScaleSettings};

/// Concrete drivers handed over to [`Rig::new`].
pub struct BoardParts<B: Board> {
    pub register: B::Register,
    pub load_cell: B::LoadCell,
    pub eeprom: B::Eeprom,
    pub thermometer: B::Thermometer,
    pub pixels: B::Pixels,
}

pub struct Rig<B: Board> {
    pub relays: RelayBank<B::Register>,
    pub scale: Scale<B::LoadCell, B::Eeprom>,
    pub thermometer: B::Thermometer,
    pub pixels: PixelAnimation<B::Pixels>,
}

impl<B: Board> Rig<B> {
    /// Run the startup sequence.
    ///
    /// 1. Relays are driven open (safe state).
    /// 2. The scale factor is loaded from EEPROM and the scale is tared.
    /// 3. The LED strip starts fading to the configured boot colour.
    pub fn new(config: &RigConfig, parts: BoardParts<B>) -> Self {
        let relays = RelayBank::new(parts.register, config.relays_inverted);

        let store = CalibrationStore::with_default(
            parts.eeprom,
            usize::from(config.calibration_address),
            config.default_scale,
        );
        let scale = Scale::begin(parts.load_cell, store, ScaleSettings::from(config));

        let pixels = PixelAnimation::from_config(parts.pixels, config);

        info!(
            "Rig: started ({} relays, {} pixels @ {} fps)",
            relays.relay_count(),
            pixels.pixel_count(),
            config.led_fps
        );

        Self {
            relays,
            scale,
            thermometer: parts.thermometer,
            pixels,
        }
    }

    /// Periodic work that runs independently of command traffic.
    ///
    /// Returns `true` if a new LED frame was pushed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        self.pixels.process(now_ms)
    }
}
