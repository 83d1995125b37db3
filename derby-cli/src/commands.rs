use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use derby_config::DerbyConfig;
use derby_engine::{run_race_mode, RaceOptions};
use derby_telemetry::logging::EventLogger;
use derby_telemetry::metrics::MetricsRecorder;

type CliResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a race log and announce the winner
    Race(RaceArgs),
    /// Serve the asset directory over HTTP
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RaceArgs {
    /// Race log to replay; `-` reads standard input. Defaults to `log.path`.
    #[arg(short, long)]
    pub log: Option<PathBuf>,
    /// Configuration file layered over the defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Number of races to run on the same log
    #[arg(long, default_value_t = 1)]
    pub repeat: u32,
    /// Write the final frame as a PPM image
    #[arg(long)]
    pub snapshot: Option<PathBuf>,
    /// Print Prometheus metrics when done
    #[arg(long)]
    pub metrics: bool,
    /// Record draw commands instead of rasterising
    #[arg(long)]
    pub headless: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Directory to serve. Defaults to `server.root`.
    #[arg(short, long)]
    pub root: Option<PathBuf>,
    /// Listen address. Defaults to `server.bind`.
    #[arg(short, long)]
    pub bind: Option<String>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<DerbyConfig, derby_config::ConfigError> {
    let config = match path {
        Some(path) => DerbyConfig::load_from_path(path)?,
        None => DerbyConfig::load()?,
    };
    EventLogger::init_with_level(&config.telemetry.log_level);
    Ok(config)
}

/// Cancelled on Ctrl-C.
fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });
    token
}

pub async fn run_race(args: RaceArgs, metrics: MetricsRecorder) -> CliResult {
    let config = load_config(args.config.as_deref())?;
    let options = RaceOptions {
        log: args.log,
        repeat: args.repeat,
        snapshot: args.snapshot,
        headless: args.headless,
    };

    let outcomes = run_race_mode(&config, &options, metrics.clone(), shutdown_on_ctrl_c()).await?;
    info!("{} race(s) complete", outcomes.len());

    if args.metrics {
        println!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub async fn run_serve(args: ServeArgs) -> CliResult {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(root) = args.root {
        config.server.root = root;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    derby_server::serve(&config.server, shutdown_on_ctrl_c()).await?;
    Ok(())
}
