//! Virtual COM port router.
//!
//! Pairs virtual COM ports (via com0com's `setupc`) and routes the serial
//! byte stream of each user-facing port into a TCP connection. Every route
//! is an independent [`router::Router`] with its own relay thread and
//! start/stop lifecycle; active routes live in a [`registry::RouteRegistry`]
//! owned by the process entry point.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pairing;
pub mod registry;
pub mod router;
pub mod transport;
