//! TCP endpoint for the route target
//!
//! Outbound client connection only; the route never listens. Each
//! resolved address of host:port is tried with a bounded connect
//! timeout so a dead target cannot stall start() indefinitely.

use crate::constants::TCP_CONNECT_TIMEOUT_MS;
use crate::error::{Result, RouterError};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Connect to the route target
pub fn connect(host: &str, port: u16) -> Result<TcpStream> {
    let target = format!("{}:{}", host, port);

    let addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| RouterError::SocketConnect {
            addr: target.clone(),
            source: e,
        })?;

    let timeout = Duration::from_millis(TCP_CONNECT_TIMEOUT_MS);
    let mut last_err = None;

    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                let _ = stream.set_nodelay(true);
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(RouterError::SocketConnect {
        addr: target,
        source: last_err.unwrap_or_else(|| io::Error::other("no addresses resolved")),
    })
}
