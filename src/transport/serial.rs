//! Serial endpoint for COM-style ports
//!
//! Opens a named port at a fixed baud rate with a short read timeout.
//! The timeout makes the relay's 1-byte fallback read return empty
//! instead of blocking forever, which keeps stop latency bounded.

use super::SerialLink;
use crate::constants::SERIAL_READ_TIMEOUT_MS;
use crate::error::{Result, RouterError};
use std::io::{self, Read};
use std::time::Duration;

/// `SerialLink` backed by a real serial port handle
struct PortLink {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialLink for PortLink {
    fn bytes_available(&mut self) -> io::Result<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn is_open(&self) -> bool {
        // An open handle stays usable until dropped; device loss surfaces
        // as read errors.
        true
    }
}

/// Open a serial port for routing
pub fn open(port_name: &str, baud_rate: u32) -> Result<Box<dyn SerialLink>> {
    let port = serialport::new(port_name, baud_rate)
        .timeout(Duration::from_millis(SERIAL_READ_TIMEOUT_MS))
        .open()
        .map_err(|e| RouterError::SerialOpen {
            port: port_name.to_string(),
            source: io::Error::other(e.to_string()),
        })?;

    Ok(Box::new(PortLink { port }))
}
