//! Endpoint plumbing for routes
//!
//! Separates endpoint concerns from route logic:
//! - **serial**: opening a COM-style port and byte-level access through
//!   the [`SerialLink`] trait
//! - **tcp**: the outbound client connection to the route target
//!
//! The relay loop operates on `SerialLink` rather than directly on a
//! serial port handle, enabling both real hardware routing and
//! deterministic testing with scripted endpoints.

pub mod serial;
pub mod tcp;

use std::io;

/// Byte-level access to an open serial endpoint
///
/// The production implementation wraps a `serialport` handle configured
/// with a short read timeout. A link is exclusively owned by one route
/// for its entire open lifetime; dropping it closes the device.
pub trait SerialLink: Send {
    /// Number of bytes ready to read without blocking
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Read up to `buf.len()` bytes
    ///
    /// Returns `Ok(0)` when the read timeout expires with nothing
    /// received. Any other error is fatal to the route.
    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the underlying device still reports itself usable
    fn is_open(&self) -> bool;
}
