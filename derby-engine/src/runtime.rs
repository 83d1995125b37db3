/*!
# Race Runtime

Entry points shared by frontends. `run_race_mode` resolves the log source,
picks a surface and runs one or more races back to back, re-ingesting the
log for every race.
*/

use std::path::{Path, PathBuf};
use std::sync::Arc;

use opentelemetry::KeyValue;
use parking_lot::Mutex;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use derby_config::DerbyConfig;
use derby_core::ingest::{ingest, BytesLogSource, FileLogSource, LogSource};
use derby_render::{Canvas, RecordingSurface, SharedSurface, Surface};
use derby_telemetry::logging::EventLogger;
use derby_telemetry::metrics::MetricsRecorder;

use crate::coordinator::{RaceCoordinator, RaceOutcome};
use crate::error::RaceError;
use crate::presenter::LogPresenter;

/// Per-invocation overrides on top of the configuration.
#[derive(Clone, Debug, Default)]
pub struct RaceOptions {
    /// Replaces `log.path`. `-` reads standard input.
    pub log: Option<PathBuf>,
    /// Races to run on the same log. Zero is treated as one.
    pub repeat: u32,
    /// Where to write the final canvas as PPM.
    pub snapshot: Option<PathBuf>,
    /// Record draw commands instead of rasterising.
    pub headless: bool,
}

/// Runs `options.repeat` races and returns their outcomes in order.
#[instrument(level = "info", name = "run_race_mode", skip_all)]
pub async fn run_race_mode(
    config: &DerbyConfig,
    options: &RaceOptions,
    metrics: MetricsRecorder,
    shutdown: CancellationToken,
) -> Result<Vec<RaceOutcome>, RaceError> {
    let path = options
        .log
        .clone()
        .unwrap_or_else(|| config.log.path.clone());
    let source = open_source(&path).await?;
    let width = config.race.track_width;
    let height = config.render.track_height;

    if options.headless {
        if options.snapshot.is_some() {
            warn!("Snapshot requested in headless mode, ignoring");
        }
        let surface = Arc::new(Mutex::new(RecordingSurface::new(1)));
        run_on(config, options, source.as_ref(), surface, metrics, shutdown).await
    } else {
        let blank = Canvas::new(width, height, config.render.background);
        let canvas = config
            .render
            .sprite_tints
            .iter()
            .fold(blank, |canvas, (asset, tint)| {
                canvas.with_sprite_tint(asset.clone(), *tint)
            });
        let surface = Arc::new(Mutex::new(canvas));
        let shared = surface.clone();
        let outcomes =
            run_on(config, options, source.as_ref(), shared, metrics, shutdown).await?;
        if let Some(snapshot) = &options.snapshot {
            surface.lock().write_ppm(snapshot)?;
            info!("Final frame written to {}", snapshot.display());
        }
        Ok(outcomes)
    }
}

/// Standard input can only be read once, so it is buffered for repeats.
async fn open_source(path: &Path) -> Result<Box<dyn LogSource>, RaceError> {
    if path == Path::new("-") {
        let mut data = Vec::new();
        tokio::io::stdin().read_to_end(&mut data).await?;
        Ok(Box::new(BytesLogSource::new("stdin", data)))
    } else {
        Ok(Box::new(FileLogSource::new(path)))
    }
}

async fn run_on<S: Surface + 'static>(
    config: &DerbyConfig,
    options: &RaceOptions,
    source: &dyn LogSource,
    surface: SharedSurface<S>,
    metrics: MetricsRecorder,
    shutdown: CancellationToken,
) -> Result<Vec<RaceOutcome>, RaceError> {
    let presenter = LogPresenter::new(config.presentation.easter_egg_url.clone());
    let coordinator = RaceCoordinator::new(
        config.race.clone(),
        config.render.clone(),
        surface,
        Arc::new(presenter),
        metrics,
    )
    .with_shutdown(shutdown);

    let races = options.repeat.max(1);
    let mut outcomes = Vec::with_capacity(races as usize);
    for round in 1..=races {
        let race = Arc::new(ingest(source, config.race.track_width).await);
        EventLogger::log_event(
            "log_ingested",
            vec![
                KeyValue::new("source", source.describe()),
                KeyValue::new("records", race.len() as i64),
                KeyValue::new(
                    "max_aggregate_distance",
                    race.max_aggregate_distance() as i64,
                ),
                KeyValue::new("scale", race.scale() as i64),
            ],
        )
        .await;

        EventLogger::log_event(
            "race_started",
            vec![
                KeyValue::new("round", i64::from(round)),
                KeyValue::new("participants", config.roster.len() as i64),
            ],
        )
        .await;

        let outcome = coordinator.run(race, &config.roster).await?;

        let winner = outcome
            .winner
            .as_ref()
            .map(|w| w.winner_key.clone())
            .unwrap_or_else(|| "none".into());
        EventLogger::log_event(
            "race_complete",
            vec![
                KeyValue::new("round", i64::from(round)),
                KeyValue::new("winner", winner),
                KeyValue::new("ticks", outcome.ticks as i64),
                KeyValue::new("frames", outcome.frames as i64),
            ],
        )
        .await;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
