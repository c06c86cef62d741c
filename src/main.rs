//! ChemTrack Monitor: periodic chemical status alerts
//!
//! Wires the record store, notification transport and monitor together and
//! either runs the scheduled job or a single manual check.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use chemtrack_core::config::AppConfig;
use chemtrack_core::error::AppError;
use chemtrack_monitor::{ChemicalMonitor, CycleOutcome, MonitorScheduler};

#[derive(Debug, Parser)]
#[command(name = "chemtrack-monitor", version, about = "Chemical inventory alert monitor")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scheduled chemical status check until interrupted
    Serve,
    /// Run one chemical status check now and print its report
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    let result = match cli.command {
        Command::Serve => serve(config).await,
        Command::Check => check(config).await,
    };

    if let Err(e) = result {
        tracing::error!("chemtrack-monitor error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn build_monitor(config: &AppConfig) -> Result<Arc<ChemicalMonitor>, AppError> {
    tracing::info!("Initializing record store (provider: {:?})...", config.store.provider);
    let store = chemtrack_database::build_store(&config.store).await?;

    tracing::info!("Initializing notification transport (provider: {:?})...", config.notify.provider);
    let transport = chemtrack_notify::build_transport(&config.notify);

    Ok(Arc::new(ChemicalMonitor::new(store, transport, config)))
}

/// Run the scheduler until Ctrl+C or SIGTERM
async fn serve(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting ChemTrack monitor v{}", env!("CARGO_PKG_VERSION"));

    let monitor = build_monitor(&config).await?;
    let scheduler = MonitorScheduler::new(monitor, config.monitor.clone()).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    scheduler.run(shutdown_rx).await?;

    tracing::info!("ChemTrack monitor shut down gracefully");
    Ok(())
}

/// Run a single cycle and print the report as JSON
async fn check(config: AppConfig) -> Result<(), AppError> {
    let monitor = build_monitor(&config).await?;

    match monitor.trigger().await? {
        CycleOutcome::Completed(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        CycleOutcome::Skipped => {
            tracing::warn!("Chemical status check skipped");
        }
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
