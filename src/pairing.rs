//! Virtual COM port pair management
//!
//! Shells out to com0com's setup utility (`setupc.exe` by default,
//! configurable) to install and remove virtual port pairs. The utility
//! must be reachable through PATH or configured with a full path. The
//! router itself never creates or deletes devices by other means; it
//! only operates on ports that already exist.

use crate::error::{Result, RouterError};
use std::process::Command;
use tracing::{debug, info};

/// Create a virtual COM port pair
///
/// `user_port` is the user-facing name (e.g. COM7), `internal_port` the
/// application-facing end of the pair (e.g. CNCB0). Both ends are
/// installed with baud rate emulation enabled.
pub fn create_pair(program: &str, user_port: &str, internal_port: &str) -> Result<()> {
    run_setupc(
        program,
        "install",
        &[
            "install".to_string(),
            format!("PortName={},EmuBR=yes", user_port),
            format!("PortName={},EmuBR=yes", internal_port),
        ],
    )?;
    info!("Created COM port pair {} <=> {}", user_port, internal_port);
    Ok(())
}

/// Remove a virtual COM port or pair
///
/// Accepts a port name (e.g. COM7) or a pair index, as understood by the
/// setup utility.
pub fn remove_port(program: &str, port_name_or_index: &str) -> Result<()> {
    run_setupc(
        program,
        "remove",
        &["remove".to_string(), port_name_or_index.to_string()],
    )?;
    info!("Removed COM port pair for {}", port_name_or_index);
    Ok(())
}

/// Run the setup utility and check its exit status
fn run_setupc(program: &str, action: &'static str, args: &[String]) -> Result<()> {
    debug!("Running {} {}", program, args.join(" "));

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| RouterError::PairingSpawn {
            program: program.to_string(),
            source: e,
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stdout.trim().is_empty() {
        debug!("{} stdout: {}", action, stdout.trim());
    }
    if !stderr.trim().is_empty() {
        debug!("{} stderr: {}", action, stderr.trim());
    }

    if output.status.success() {
        Ok(())
    } else {
        Err(RouterError::PairingFailed {
            action,
            code: output.status.code(),
            stderr: stderr.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_pair_with_missing_utility() {
        match create_pair("setupc-binary-that-does-not-exist", "COM77", "CNCB77") {
            Err(RouterError::PairingSpawn { program, .. }) => {
                assert_eq!(program, "setupc-binary-that-does-not-exist");
            }
            _ => panic!("Expected PairingSpawn error"),
        }
    }

    #[test]
    fn test_remove_port_with_missing_utility() {
        assert!(remove_port("setupc-binary-that-does-not-exist", "COM77").is_err());
    }
}
