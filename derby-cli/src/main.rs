//! ## derby-cli
//! **Command-line frontend**
//!
//! `derby race` replays a race log and announces the winner. `derby serve`
//! serves the asset directory over HTTP.

use clap::Parser;
use derby_telemetry::metrics::MetricsRecorder;

mod commands;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Race(race_args) => commands::run_race(race_args, metrics).await,
        Commands::Serve(serve_args) => commands::run_serve(serve_args).await,
    }
}
