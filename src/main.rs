use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feederwatch::commands::{once, watch};
use feederwatch::config::Config;

#[derive(Parser)]
#[command(
    name = "feederwatch",
    version,
    about = "Status monitor for ADS-B feeder appliances",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// TOML configuration file (defaults to environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the feeder continuously and print each update
    Watch {
        /// Feeder base URL
        #[arg(short, long)]
        url: Option<String>,

        /// Seconds between refreshes (1-60)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Print snapshots as JSON lines
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Fetch the feeder status once and exit
    Once {
        /// Feeder base URL
        #[arg(short, long)]
        url: Option<String>,

        /// Print the snapshot as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format.clone_from(format);
    }

    match &cli.command {
        Commands::Watch { url, interval, .. } => {
            if let Some(url) = url {
                config.feeder.base_url.clone_from(url);
            }
            if let Some(interval) = interval {
                config.poller.refresh_interval_secs = *interval;
            }
        }
        Commands::Once { url, .. } => {
            if let Some(url) = url {
                config.feeder.base_url.clone_from(url);
            }
        }
    }

    config.validate().context("Invalid configuration")?;

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    tracing::info!(base_url = %config.feeder.base_url, "feederwatch starting");

    match cli.command {
        Commands::Watch { json, .. } => {
            tracing::info!(
                interval_secs = config.poller.refresh_interval_secs,
                json,
                "Starting watch command"
            );
            watch(&config, json).await?;
        }

        Commands::Once { json, .. } => {
            tracing::info!(json, "Starting once command");
            once(&config, json).await?;
        }
    }

    tracing::info!("feederwatch stopped");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("feederwatch=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("feederwatch={level},warn"))
            .context("Invalid log level")?
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        "json" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        _ => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }

    Ok(())
}
