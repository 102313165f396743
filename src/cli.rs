//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};

// =============================================================================
// CLI Definition
// =============================================================================

/// Virtual COM port router: manages virtual COM pairs and routes their data
#[derive(Parser, Debug)]
#[command(name = "vcom-router")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Route management commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a virtual COM port pair and route its data to a TCP target
    Create {
        /// Name for the user-facing virtual COM port (e.g. COM7)
        user_port: String,

        /// Name for the internal end of the pair (e.g. CNCB0)
        internal_port: String,

        /// Target host for data routing
        target_host: String,

        /// Target TCP port for data routing
        target_port: u16,

        /// Baud rate for the COM port (defaults to the configured rate)
        #[arg(long, value_name = "BAUD")]
        baudrate: Option<u32>,
    },

    /// Stop routing and remove a virtual COM port pair
    Delete {
        /// User-facing COM port name to delete (e.g. COM7)
        user_port: String,
    },

    /// List routes managed by this session
    List,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_create() {
        let cli = Cli::parse_from(["vcom-router", "create", "COM7", "CNCB0", "127.0.0.1", "9000"]);
        assert!(!cli.verbose);
        match cli.command {
            Command::Create {
                user_port,
                internal_port,
                target_host,
                target_port,
                baudrate,
            } => {
                assert_eq!(user_port, "COM7");
                assert_eq!(internal_port, "CNCB0");
                assert_eq!(target_host, "127.0.0.1");
                assert_eq!(target_port, 9000);
                assert_eq!(baudrate, None);
            }
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_cli_parse_create_with_baudrate() {
        let cli = Cli::parse_from([
            "vcom-router",
            "create",
            "COM7",
            "CNCB0",
            "127.0.0.1",
            "9000",
            "--baudrate",
            "115200",
        ]);
        match cli.command {
            Command::Create { baudrate, .. } => assert_eq!(baudrate, Some(115200)),
            _ => panic!("Expected Create command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["vcom-router", "-v", "list"]);
        assert!(cli.verbose);

        let cli = Cli::parse_from(["vcom-router", "--verbose", "list"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_delete() {
        let cli = Cli::parse_from(["vcom-router", "delete", "COM7"]);
        match cli.command {
            Command::Delete { user_port } => assert_eq!(user_port, "COM7"),
            _ => panic!("Expected Delete command"),
        }
    }

    #[test]
    fn test_cli_parse_list() {
        let cli = Cli::parse_from(["vcom-router", "list"]);
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn test_cli_requires_a_command() {
        assert!(Cli::try_parse_from(["vcom-router"]).is_err());
    }
}
