//! Centralized error types for the router
//!
//! All route errors are represented by the `RouterError` enum.
//! Use `Result<T>` as shorthand for `std::result::Result<T, RouterError>`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// All router errors
#[derive(Debug)]
pub enum RouterError {
    // === Route establishment ===
    /// Failed to open the serial side of a route
    SerialOpen { port: String, source: io::Error },
    /// Failed to connect the socket side of a route
    SocketConnect { addr: String, source: io::Error },
    /// Failed to spawn the relay thread for a route
    RelaySpawn { source: io::Error },

    // === Pairing utility ===
    /// The pairing utility could not be launched
    PairingSpawn { program: String, source: io::Error },
    /// The pairing utility ran but reported failure
    PairingFailed {
        action: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    // === IO ===
    /// Config file could not be read
    ConfigRead { path: PathBuf, source: io::Error },

    // === Runtime ===
    /// Tokio runtime creation failed
    Runtime { source: io::Error },
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerialOpen { source, .. }
            | Self::SocketConnect { source, .. }
            | Self::RelaySpawn { source }
            | Self::PairingSpawn { source, .. }
            | Self::ConfigRead { source, .. }
            | Self::Runtime { source } => Some(source),
            Self::PairingFailed { .. } => None,
        }
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerialOpen { port, source } => {
                write!(f, "Cannot open serial port {}: {}", port, source)
            }
            Self::SocketConnect { addr, source } => {
                write!(f, "Cannot connect to {}: {}", addr, source)
            }
            Self::RelaySpawn { .. } => write!(f, "Failed to spawn relay thread"),
            Self::PairingSpawn { program, source } => {
                write!(f, "Cannot run pairing utility {}: {}", program, source)
            }
            Self::PairingFailed {
                action,
                code,
                stderr,
            } => match code {
                Some(code) if !stderr.is_empty() => {
                    write!(f, "Pairing {} failed with code {}: {}", action, code, stderr)
                }
                Some(code) => write!(f, "Pairing {} failed with code {}", action, code),
                None => write!(f, "Pairing {} terminated by signal", action),
            },
            Self::ConfigRead { path, .. } => write!(f, "Cannot read config: {}", path.display()),
            Self::Runtime { .. } => write!(f, "Failed to create runtime"),
        }
    }
}

/// Alias for Result with RouterError
pub type Result<T> = std::result::Result<T, RouterError>;
