//! Data-routing core
//!
//! A [`Router`] owns one serial endpoint and one TCP connection and
//! relays the serial byte stream into the socket on a background thread.
//! Lifecycle: created -> start() -> running -> stop() (or relay
//! self-terminates on the first endpoint error) -> stopped. A stopped
//! router can be started again.

mod relay;
pub mod stats;

use self::stats::RouteStats;
use crate::constants::{HANDLE_RELEASE_TIMEOUT_MS, JOIN_POLL_INTERVAL_MS, STOP_JOIN_TIMEOUT_MS};
use crate::error::{Result, RouterError};
use crate::transport::{self, SerialLink};
use parking_lot::Mutex;
use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Factory for the serial side of a route
///
/// Tests substitute scripted endpoints here; production routes use
/// [`transport::serial::open`].
pub type SerialFactory = Box<dyn Fn(&str, u32) -> Result<Box<dyn SerialLink>> + Send>;

/// Routes data from a serial COM port to a TCP target
pub struct Router {
    port_name: String,
    baud_rate: u32,
    target_host: String,
    target_port: u16,
    serial: Arc<Mutex<Option<Box<dyn SerialLink>>>>,
    socket: Arc<Mutex<Option<TcpStream>>>,
    running: Arc<AtomicBool>,
    relay: Option<JoinHandle<()>>,
    stats: Arc<RouteStats>,
    serial_factory: SerialFactory,
}

impl Router {
    /// Create a router for the given port and target
    ///
    /// No connection is attempted until `start()`.
    pub fn new(
        port_name: impl Into<String>,
        baud_rate: u32,
        target_host: impl Into<String>,
        target_port: u16,
    ) -> Self {
        Self::with_serial_factory(
            port_name,
            baud_rate,
            target_host,
            target_port,
            Box::new(transport::serial::open),
        )
    }

    /// Create a router with a custom serial factory
    pub fn with_serial_factory(
        port_name: impl Into<String>,
        baud_rate: u32,
        target_host: impl Into<String>,
        target_port: u16,
        serial_factory: SerialFactory,
    ) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            target_host: target_host.into(),
            target_port,
            serial: Arc::new(Mutex::new(None)),
            socket: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
            relay: None,
            stats: Arc::new(RouteStats::new()),
            serial_factory,
        }
    }

    // =========================================================================
    // State queries
    // =========================================================================

    /// Whether the relay is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn target_host(&self) -> &str {
        &self.target_host
    }

    pub fn target_port(&self) -> u16 {
        self.target_port
    }

    /// Traffic counters for this route
    pub fn stats(&self) -> &Arc<RouteStats> {
        &self.stats
    }

    fn target(&self) -> String {
        format!("{}:{}", self.target_host, self.target_port)
    }

    // =========================================================================
    // Lifecycle control
    // =========================================================================

    /// Start routing
    ///
    /// Opens the serial port, connects to the target, and spawns the relay
    /// thread. Returns immediately after the relay is launched. Calling
    /// start() on an already-running route logs and returns Ok without
    /// side effects.
    pub fn start(&mut self) -> Result<()> {
        if self.running.load(Ordering::SeqCst) {
            info!("Route {} is already active", self.port_name);
            return Ok(());
        }

        self.connect()?;
        self.running.store(true, Ordering::SeqCst);

        let ctx = relay::RelayContext {
            port_name: self.port_name.clone(),
            target: self.target(),
            serial: self.serial.clone(),
            socket: self.socket.clone(),
            running: self.running.clone(),
            stats: self.stats.clone(),
        };

        let thread = std::thread::Builder::new()
            .name(format!("relay-{}", self.port_name))
            .spawn(move || relay::run(ctx));

        match thread {
            Ok(handle) => {
                self.relay = Some(handle);
                info!("Routing {} -> {}", self.port_name, self.target());
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                self.release_handles();
                Err(RouterError::RelaySpawn { source: e })
            }
        }
    }

    /// Stop routing
    ///
    /// Always safe to call, any number of times, from any thread. Signals
    /// the relay, waits a bounded time for it to finish, then closes both
    /// endpoints. Never fails; close-time errors are logged and swallowed.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);

        if let Some(handle) = self.relay.take() {
            let deadline = Instant::now() + Duration::from_millis(STOP_JOIN_TIMEOUT_MS);
            while !handle.is_finished() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(JOIN_POLL_INTERVAL_MS));
            }
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                warn!("Relay thread for {} did not stop in time", self.port_name);
            }
        }

        self.release_handles();
        debug!("Route {} released", self.port_name);
    }

    /// Open both endpoints, serial first
    ///
    /// The serial device is the scarcer resource, so it is acquired before
    /// any network I/O is attempted. On any failure both handle slots stay
    /// absent.
    fn connect(&mut self) -> Result<()> {
        debug!(
            "Opening serial port {} at {} baud",
            self.port_name, self.baud_rate
        );
        let serial = (self.serial_factory)(&self.port_name, self.baud_rate)?;

        debug!("Connecting to {}", self.target());
        let socket = match transport::tcp::connect(&self.target_host, self.target_port) {
            Ok(socket) => socket,
            Err(e) => {
                // The serial port is already open and must not leak
                drop(serial);
                return Err(e);
            }
        };

        *self.serial.lock() = Some(serial);
        *self.socket.lock() = Some(socket);
        Ok(())
    }

    /// Close and clear both endpoints, each independently
    ///
    /// Lock acquisition is bounded so a wedged relay thread cannot hang
    /// shutdown; a handle that stays locked is dropped by the relay when
    /// it exits.
    fn release_handles(&self) {
        let lock_timeout = Duration::from_millis(HANDLE_RELEASE_TIMEOUT_MS);

        match self.serial.try_lock_for(lock_timeout) {
            Some(mut slot) => {
                if slot.take().is_some() {
                    debug!("Closed serial port {}", self.port_name);
                }
            }
            None => warn!(
                "Serial handle for {} still held by relay, skipping close",
                self.port_name
            ),
        }

        match self.socket.try_lock_for(lock_timeout) {
            Some(mut slot) => {
                if let Some(socket) = slot.take() {
                    if let Err(e) = socket.shutdown(Shutdown::Both) {
                        debug!("Socket shutdown for {} failed: {}", self.port_name, e);
                    }
                }
            }
            None => warn!(
                "Socket handle for {} still held by relay, skipping close",
                self.port_name
            ),
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) || self.relay.is_some() {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_start_is_safe() {
        let mut router = Router::new("COM7", 9600, "127.0.0.1", 9000);
        router.stop();
        router.stop();
        assert!(!router.is_running());
    }

    #[test]
    fn test_start_fails_on_missing_serial_port() {
        let mut router = Router::new("port-that-does-not-exist", 9600, "127.0.0.1", 9000);
        match router.start() {
            Err(RouterError::SerialOpen { port, .. }) => {
                assert_eq!(port, "port-that-does-not-exist");
            }
            other => panic!("Expected SerialOpen error, got {:?}", other.map(|_| ())),
        }
        assert!(!router.is_running());
        // A failed start must leave the router fully released
        router.stop();
    }

    #[test]
    fn test_accessors() {
        let router = Router::new("COM7", 115200, "192.168.1.10", 12345);
        assert_eq!(router.port_name(), "COM7");
        assert_eq!(router.baud_rate(), 115200);
        assert_eq!(router.target_host(), "192.168.1.10");
        assert_eq!(router.target_port(), 12345);
        assert_eq!(router.stats().forwarded(), 0);
    }
}
