//! Relay loop for an active route
//!
//! Runs on a dedicated blocking thread. Each cycle drains whatever the
//! serial side reports as immediately available, falling back to a
//! 1-byte read bounded by the port's read timeout, and writes the result
//! to the socket in order. The first endpoint error ends the route; there
//! is no retry or reconnect.

use super::stats::RouteStats;
use crate::constants::{RELAY_BUFFER_SIZE, RELAY_IDLE_DELAY_MS};
use crate::transport::SerialLink;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, trace, warn};

/// Everything the relay thread needs, cloned out of the Router
pub(super) struct RelayContext {
    pub port_name: String,
    pub target: String,
    pub serial: Arc<Mutex<Option<Box<dyn SerialLink>>>>,
    pub socket: Arc<Mutex<Option<TcpStream>>>,
    pub running: Arc<AtomicBool>,
    pub stats: Arc<RouteStats>,
}

/// Why a relay cycle ended the route
enum CycleEnd {
    /// A handle was cleared or the port no longer reports open
    HandlesGone,
    Serial(io::Error),
    Socket(io::Error),
}

/// Relay thread entry point
///
/// Loops until `running` is cleared externally or a cycle fails, then
/// clears `running` itself so callers observe the termination.
pub(super) fn run(ctx: RelayContext) {
    info!("Relay started for {} -> {}", ctx.port_name, ctx.target);
    let mut buf = [0u8; RELAY_BUFFER_SIZE];

    while ctx.running.load(Ordering::SeqCst) {
        if let Err(end) = cycle(&ctx, &mut buf) {
            ctx.running.store(false, Ordering::SeqCst);
            match end {
                CycleEnd::HandlesGone => {
                    warn!(
                        "Connection for {} no longer available, stopping route",
                        ctx.port_name
                    );
                }
                CycleEnd::Serial(e) => {
                    error!("Serial error on {}: {}, stopping route", ctx.port_name, e);
                }
                CycleEnd::Socket(e) => {
                    error!(
                        "Socket error routing {} to {}: {}, stopping route",
                        ctx.port_name, ctx.target, e
                    );
                }
            }
            break;
        }

        // Guard against a tight spin when the port reports no data and
        // returns immediately
        std::thread::sleep(Duration::from_millis(RELAY_IDLE_DELAY_MS));
    }

    info!("Relay stopped for {}", ctx.port_name);
}

/// One read-and-forward cycle
///
/// Holds both handle locks for the duration of the cycle; they are
/// released before the inter-cycle sleep so stop() can claim them.
fn cycle(ctx: &RelayContext, buf: &mut [u8]) -> std::result::Result<(), CycleEnd> {
    let mut serial_slot = ctx.serial.lock();
    let mut socket_slot = ctx.socket.lock();

    let (Some(serial), Some(socket)) = (serial_slot.as_mut(), socket_slot.as_mut()) else {
        return Err(CycleEnd::HandlesGone);
    };
    if !serial.is_open() {
        return Err(CycleEnd::HandlesGone);
    }

    // Drain what is already waiting; otherwise block on a single byte up
    // to the port's read timeout
    let available = serial.bytes_available().map_err(CycleEnd::Serial)?;
    let want = available.clamp(1, buf.len());
    let read = serial.read_some(&mut buf[..want]).map_err(CycleEnd::Serial)?;

    if read > 0 {
        socket.write_all(&buf[..read]).map_err(CycleEnd::Socket)?;
        ctx.stats.add_forwarded(read);
        trace!("Routed {} bytes from {}", read, ctx.port_name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    struct EndlessSerial;

    impl SerialLink for EndlessSerial {
        fn bytes_available(&mut self) -> io::Result<usize> {
            Ok(4)
        }
        fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(4);
            buf[..n].fill(0x55);
            Ok(n)
        }
        fn is_open(&self) -> bool {
            true
        }
    }

    struct ClosedSerial;

    impl SerialLink for ClosedSerial {
        fn bytes_available(&mut self) -> io::Result<usize> {
            Ok(0)
        }
        fn read_some(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
        fn is_open(&self) -> bool {
            false
        }
    }

    fn context(
        serial: Option<Box<dyn SerialLink>>,
        socket: Option<TcpStream>,
    ) -> RelayContext {
        RelayContext {
            port_name: "COM7".to_string(),
            target: "127.0.0.1:0".to_string(),
            serial: Arc::new(Mutex::new(serial)),
            socket: Arc::new(Mutex::new(socket)),
            running: Arc::new(AtomicBool::new(true)),
            stats: Arc::new(RouteStats::new()),
        }
    }

    fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let client = TcpStream::connect(addr).unwrap();
        let (server, _) = listener.accept().unwrap();
        (client, server)
    }

    #[test]
    fn test_missing_handles_clear_running() {
        let (client, _server) = connected_pair();
        let ctx = context(None, Some(client));
        let running = ctx.running.clone();

        run(ctx);
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_closed_port_clears_running() {
        let (client, _server) = connected_pair();
        let ctx = context(Some(Box::new(ClosedSerial)), Some(client));
        let running = ctx.running.clone();

        run(ctx);
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_socket_error_clears_running() {
        let (client, server) = connected_pair();
        // Drop the peer so writes start failing
        drop(server);

        let ctx = context(Some(Box::new(EndlessSerial)), Some(client));
        let running = ctx.running.clone();

        let handle = std::thread::spawn(move || run(ctx));

        // The first write may land in the send buffer; the route must
        // still terminate within a few cycles
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while running.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!running.load(Ordering::SeqCst));
        handle.join().unwrap();
    }

    #[test]
    fn test_forwarded_bytes_counted() {
        let (client, mut server) = connected_pair();
        let ctx = context(Some(Box::new(EndlessSerial)), Some(client));
        let running = ctx.running.clone();
        let stats = ctx.stats.clone();

        let handle = std::thread::spawn(move || run(ctx));

        use std::io::Read;
        let mut received = [0u8; 4];
        server.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        server.read_exact(&mut received).unwrap();
        assert_eq!(received, [0x55; 4]);

        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();
        assert!(stats.forwarded() >= 4);
    }
}
