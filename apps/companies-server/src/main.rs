use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gatekit::telemetry::init_logging;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod config;
mod server;

use config::AppConfig;

/// Companies server: REST access to companies behind the authorization gate
#[derive(Parser)]
#[command(name = "companies-server")]
#[command(about = "Companies server: REST access to companies behind the authorization gate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.port, cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    init_logging(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "companies-server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(config).await,
        Commands::Check => check(&config),
    }
}

fn check(config: &AppConfig) -> Result<()> {
    config.validate()?;
    println!("Configuration is valid");
    Ok(())
}

async fn run(config: AppConfig) -> Result<()> {
    config.validate()?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown signal received"),
            Err(e) => warn!(error = %e, "failed to listen for shutdown signal"),
        }
        on_signal.cancel();
    });

    server::run_server(config, cancel).await
}
