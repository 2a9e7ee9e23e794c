//! uptrail - single-host uptime monitor
//!
//! Probes one host on an interval and keeps a small persisted uptime ledger:
//! current status, streak, cumulative up/down time and recent outages.

mod config;
mod ledger;
mod presenter;
mod probe;
mod scheduler;
mod web;

use clap::{Parser, Subcommand};
use config::MonitorConfig;
use ledger::FileStore;
use probe::TargetProber;
use scheduler::{Monitor, Scheduler};
use web::Server;

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "uptrail", about = "Single-host uptime monitor", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe on an interval and serve the ledger over HTTP (default)
    Serve,
    /// Run one probe cycle, print the updated ledger as JSON and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("uptrail=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let cfg = MonitorConfig::load();
    let probe_config = cfg.probe_config();
    tracing::info!(
        "Monitoring {} via {} (timeout {:?})",
        probe_config.address(),
        probe_config.kind,
        probe_config.timeout
    );

    let store = FileStore::new(&cfg.ledger_path);
    tracing::info!("Using ledger at {}", store.path().display());

    let monitor = Arc::new(Monitor::new(TargetProber::new(probe_config), store));

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Check => {
            let report = monitor.run_cycle().await;
            println!("{}", serde_json::to_string_pretty(&report.ledger)?);
        }
        Commands::Serve => {
            let scheduler = Scheduler::new(monitor.clone(), cfg.poll_interval);
            scheduler.start().await;

            let server = Server::new(cfg, monitor);
            server.start().await?;
        }
    }

    Ok(())
}
