//! Virtual COM port router - serial-to-TCP route management
//!
//! Usage:
//!   vcom-router create COM7 CNCB0 127.0.0.1 9000   Create a pair and start routing
//!   vcom-router delete COM7                        Stop routing and remove the pair
//!   vcom-router list                               List routes in this session
//!
//! After a successful create, the process stays alive while routes are
//! running; Ctrl+C stops all routes and exits.

use clap::Parser;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use vcom_router::cli::{Cli, Command};
use vcom_router::config::{self, Config};
use vcom_router::constants::SHUTDOWN_POLL_INTERVAL_SECS;
use vcom_router::error::Result;
use vcom_router::logging;
use vcom_router::pairing;
use vcom_router::registry::RouteRegistry;
use vcom_router::router::Router;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = config::load();
    let mut registry = RouteRegistry::new();

    match cli.command {
        Command::Create {
            user_port,
            internal_port,
            target_host,
            target_port,
            baudrate,
        } => {
            let baud_rate = baudrate.unwrap_or(cfg.route.baud_rate);
            create_route(
                &cfg,
                &mut registry,
                user_port,
                internal_port,
                target_host,
                target_port,
                baud_rate,
            )?;
            wait_for_shutdown(&mut registry).await;
            Ok(())
        }
        Command::Delete { user_port } => delete_route(&cfg, &mut registry, &user_port),
        Command::List => {
            list_routes(&registry);
            Ok(())
        }
    }
}

/// Install the port pair, then start and register a route for it
///
/// A pair that was installed but whose route failed to start is removed
/// again so it is not left behind without a route.
fn create_route(
    cfg: &Config,
    registry: &mut RouteRegistry,
    user_port: String,
    internal_port: String,
    target_host: String,
    target_port: u16,
    baud_rate: u32,
) -> Result<()> {
    pairing::create_pair(&cfg.pairing.setupc, &user_port, &internal_port)?;

    let mut router = Router::new(user_port.clone(), baud_rate, target_host, target_port);
    if let Err(e) = router.start() {
        if let Err(cleanup) = pairing::remove_port(&cfg.pairing.setupc, &user_port) {
            warn!(
                "Cleanup of COM port pair {} after failed start also failed: {}",
                user_port, cleanup
            );
        }
        return Err(e);
    }

    registry.insert(router);
    Ok(())
}

/// Stop the session's route for a port (if any) and remove the pair
fn delete_route(cfg: &Config, registry: &mut RouteRegistry, user_port: &str) -> Result<()> {
    match registry.remove(user_port) {
        Some(mut router) => {
            router.stop();
            info!("Stopped route for {}", user_port);
        }
        None => info!("No active route for {} in this session", user_port),
    }

    pairing::remove_port(&cfg.pairing.setupc, user_port)
}

fn list_routes(registry: &RouteRegistry) {
    if registry.is_empty() {
        println!("No active routes in this session.");
        return;
    }

    for route in registry.iter() {
        println!(
            "{} ({} baud) -> {}:{} [{}] {} bytes forwarded",
            route.port_name(),
            route.baud_rate(),
            route.target_host(),
            route.target_port(),
            if route.is_running() { "active" } else { "stopped" },
            route.stats().forwarded(),
        );
    }
}

/// Keep the process alive while routes run, then stop everything
///
/// Exits when a shutdown signal arrives or when every route has
/// terminated on its own.
async fn wait_for_shutdown(registry: &mut RouteRegistry) {
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_signal_watcher(shutdown.clone());

    info!("Routing active, press Ctrl+C to stop");
    while !shutdown.load(Ordering::SeqCst) && registry.any_running() {
        tokio::time::sleep(Duration::from_secs(SHUTDOWN_POLL_INTERVAL_SECS)).await;
    }

    if shutdown.load(Ordering::SeqCst) {
        info!("Shutdown requested, stopping all routes");
    } else {
        info!("All routes have stopped");
    }
    registry.stop_all();
}

fn spawn_signal_watcher(shutdown: Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        tokio::spawn(async move {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).unwrap();
            let mut sigint =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).unwrap();

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            shutdown.store(true, Ordering::SeqCst);
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown.store(true, Ordering::SeqCst);
        });
    }
}
