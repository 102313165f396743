//! Configuration management
//!
//! Config file is stored next to the executable as `config.toml`.
//! Missing file or parse errors fall back to defaults with a warning;
//! a broken config must never prevent the router from starting.

use crate::constants::{DEFAULT_BAUD_RATE, DEFAULT_SETUPC_PROGRAM};
use crate::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub route: RouteConfig,
    pub pairing: PairingConfig,
}

/// Defaults applied to newly created routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Baud rate used when the create command gives none
    pub baud_rate: u32,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// Pairing utility configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Command used to install/remove port pairs (name on PATH or full path)
    pub setupc: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            setupc: DEFAULT_SETUPC_PROGRAM.to_string(),
        }
    }
}

/// Get the config file path (next to the executable)
fn config_path() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| RouterError::ConfigRead {
        path: PathBuf::from("executable"),
        source: e,
    })?;
    let exe_dir = exe.parent().ok_or_else(|| RouterError::ConfigRead {
        path: exe.clone(),
        source: std::io::Error::other("executable has no parent directory"),
    })?;
    Ok(exe_dir.join("config.toml"))
}

/// Load config from file, or defaults if absent or unreadable
pub fn load() -> Config {
    let path = match config_path() {
        Ok(p) => p,
        Err(e) => {
            warn!("Failed to determine config path: {}, using defaults", e);
            return Config::default();
        }
    };

    if !path.exists() {
        return Config::default();
    }

    match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!("Config parse error in {:?}: {}, using defaults", path, e);
                Config::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config {:?}: {}, using defaults", path, e);
            Config::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.route.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(config.pairing.setupc, DEFAULT_SETUPC_PROGRAM);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
[route]
baud_rate = 115200

[pairing]
setupc = "C:\\Program Files (x86)\\com0com\\setupc.exe"
"#,
        )
        .unwrap();

        assert_eq!(config.route.baud_rate, 115200);
        assert!(config.pairing.setupc.ends_with("setupc.exe"));
    }

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[route]
baud_rate = 19200
"#,
        )
        .unwrap();

        assert_eq!(config.route.baud_rate, 19200);
        assert_eq!(config.pairing.setupc, DEFAULT_SETUPC_PROGRAM);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.route.baud_rate, DEFAULT_BAUD_RATE);
    }
}
