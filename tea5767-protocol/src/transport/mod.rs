use std::io;

#[cfg(feature = "i2c")]
pub mod i2c;

/// A byte-oriented two-wire bus connection to a single slave device.
///
/// Implementors own the open bus handle and release it on drop.
/// All calls are synchronous and blocking.
pub trait Transport: Send {
    /// Direct subsequent reads and writes at the slave `address`.
    fn address_device(&mut self, address: u8) -> io::Result<()>;

    /// Write `buf` in a single transfer. Returns the number of bytes written.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Read into `buf` in a single transfer. Returns the number of bytes read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}
