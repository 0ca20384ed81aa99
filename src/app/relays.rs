//! Relay bank: logical relay indices over a shift-register chain.
//!
//! Callers always speak in logical terms (open / closed).  The bank XORs
//! each request with the board's inversion flag, so active-low relay
//! modules need no special handling above this layer.
//!
//! The bank is write-only: relay state lives in the register outputs and
//! cannot be read back.

use log::{info, warn};

use crate::error::{Error, Result};

use super::ports::ShiftRegisterPort;

/// Relay id that addresses every relay at once.
pub const BROADCAST_RELAY: u8 = 255;

pub struct RelayBank<R: ShiftRegisterPort> {
    register: R,
    relay_count: usize,
    inverted: bool,
}

impl<R: ShiftRegisterPort> RelayBank<R> {
    /// Take ownership of the register chain and drive every relay open.
    pub fn new(register: R, inverted: bool) -> Self {
        // Id 255 is reserved for broadcast, so at most 255 relays are addressable.
        let relay_count = register.output_count().min(usize::from(BROADCAST_RELAY));
        let mut bank = Self {
            register,
            relay_count,
            inverted,
        };
        if let Err(e) = bank.open_all_relays() {
            warn!("RelayBank: failed to open relays at startup: {}", e);
        }
        info!(
            "RelayBank: {} relays, {}",
            relay_count,
            if inverted { "active-low" } else { "active-high" }
        );
        bank
    }

    pub fn relay_count(&self) -> usize {
        self.relay_count
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Drive one relay.  Out-of-range ids are rejected without touching
    /// the hardware.
    pub fn set_relay(&mut self, id: u8, closed: bool) -> Result<()> {
        if usize::from(id) >= self.relay_count {
            return Err(Error::InvalidAddress(id));
        }
        self.register.set(usize::from(id), closed != self.inverted)?;
        Ok(())
    }

    /// Drive every relay to the same logical state in one batched write.
    pub fn set_all(&mut self, closed: bool) -> Result<()> {
        self.register.set_all(closed != self.inverted)?;
        Ok(())
    }

    /// Return every relay to the safe, open state.
    pub fn open_all_relays(&mut self) -> Result<()> {
        self.set_all(false)
    }

    /// Borrow the underlying register (diagnostics and tests).
    pub fn register(&self) -> &R {
        &self.register
    }

    pub fn register_mut(&mut self) -> &mut R {
        &mut self.register
    }
}
