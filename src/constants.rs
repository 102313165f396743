//! Application-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Serial
// =============================================================================

/// Default baud rate for newly created routes
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Read timeout on the serial port (milliseconds)
///
/// Bounds the 1-byte fallback read in the relay loop, and therefore the
/// worst-case latency of a stop request.
pub const SERIAL_READ_TIMEOUT_MS: u64 = 1000;

// =============================================================================
// Network
// =============================================================================

/// Timeout for the outbound TCP connect (milliseconds)
pub const TCP_CONNECT_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// Timing - Relay
// =============================================================================

/// Delay between relay cycles (milliseconds)
pub const RELAY_IDLE_DELAY_MS: u64 = 10;

// =============================================================================
// Timing - Shutdown
// =============================================================================

/// How long stop() waits for the relay thread to finish (milliseconds)
pub const STOP_JOIN_TIMEOUT_MS: u64 = 2000;

/// Poll interval while waiting for the relay thread (milliseconds)
pub const JOIN_POLL_INTERVAL_MS: u64 = 20;

/// How long stop() waits for a handle lock before giving up (milliseconds)
pub const HANDLE_RELEASE_TIMEOUT_MS: u64 = 500;

/// Keep-alive poll interval in the entry point (seconds)
pub const SHUTDOWN_POLL_INTERVAL_SECS: u64 = 1;

// =============================================================================
// Buffers
// =============================================================================

/// Relay read buffer size
pub const RELAY_BUFFER_SIZE: usize = 4096;

// =============================================================================
// Pairing
// =============================================================================

/// Default com0com setup utility invoked for pair management
pub const DEFAULT_SETUPC_PROGRAM: &str = "setupc.exe";
