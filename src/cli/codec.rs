//! Line codec: splits a byte stream into command lines.
//!
//! ```text
//!   ... 'h' 'a' 'n' 'd' ... '\r' '\n' ...
//!        └──────── buffered ─────┘   └─▶ emit "hand..." (CR stripped)
//! ```
//!
//! Bytes accumulate in a fixed [`LINE_CAPACITY`] buffer.  A single
//! `Transport::read` may deliver part of a line or several lines at once;
//! both are handled.  A line that outgrows the buffer is discarded in full
//! up to its terminator so a truncated command is never executed.

use heapless::Vec;
use log::warn;

use crate::config::LINE_CAPACITY;

/// Streaming line decoder.
pub struct LineDecoder {
    buf: Vec<u8, LINE_CAPACITY>,
    line_break: u8,
    overflowed: bool,
}

impl LineDecoder {
    pub fn new(line_break: u8) -> Self {
        Self {
            buf: Vec::new(),
            line_break,
            overflowed: false,
        }
    }

    /// Feed bytes into the decoder, calling `on_line` once per complete line.
    ///
    /// Returns the number of lines delivered.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&str)) -> usize {
        let mut delivered = 0;

        for &byte in data {
            if byte != self.line_break {
                if !self.overflowed && self.buf.push(byte).is_err() {
                    warn!("LineDecoder: line exceeds {} bytes, discarding", LINE_CAPACITY);
                    self.overflowed = true;
                    self.buf.clear();
                }
                continue;
            }

            if self.overflowed {
                self.overflowed = false;
                continue;
            }

            let line = match self.buf.split_last() {
                Some((b'\r', rest)) => rest,
                _ => &self.buf[..],
            };
            match core::str::from_utf8(line) {
                Ok(text) => {
                    on_line(text);
                    delivered += 1;
                }
                Err(_) => warn!("LineDecoder: dropping non-UTF-8 line ({} bytes)", line.len()),
            }
            self.buf.clear();
        }

        delivered
    }

    /// Bytes buffered for the current, incomplete line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line (e.g. after a transport reconnect).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }
}
