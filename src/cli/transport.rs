//! Transport abstraction: any byte-oriented channel.
//!
//! The firmware uses a UART (see [`crate::adapters::serial`]); integration
//! tests use an in-memory loopback.  The command engine is generic over
//! `Transport`, so it never sees the concrete channel.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Write all of `data`, retrying short writes.
    ///
    /// A write that accepts zero bytes is reported as `Ok(false)` rather
    /// than spinning forever.
    fn write_all(&mut self, mut data: &[u8]) -> Result<bool, Self::Error> {
        while !data.is_empty() {
            let n = self.write(data)?;
            if n == 0 {
                return Ok(false);
            }
            data = &data[n.min(data.len())..];
        }
        Ok(true)
    }
}
