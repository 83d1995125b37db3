//! ## derby-core::ingest
//! **CSV race log ingestion**
//!
//! Rows are `timestamp,participantKey,distanceDelta`, no header. A row that
//! fails to parse is dropped and ingestion carries on. Only a transport
//! failure is reported, and even then the caller still gets a (possibly
//! empty) `Race` so the simulation can run to completion.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, instrument, warn};

use crate::error::{IngestError, RowError};
use crate::race::Race;
use crate::record::RaceRecord;

pub type LogReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// A sequential transport delivering race log rows.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Opens the log for a single front-to-back read.
    async fn open(&self) -> Result<LogReader, IngestError>;
}

/// Reads the log from a file on disk.
#[derive(Clone, Debug)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn open(&self) -> Result<LogReader, IngestError> {
        let file = tokio::fs::File::open(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::NotFound(self.path.clone())
            } else {
                IngestError::Io(e)
            }
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Serves an in-memory copy of a log, e.g. one slurped from stdin.
/// Can be opened any number of times.
#[derive(Clone, Debug)]
pub struct BytesLogSource {
    name: String,
    data: Arc<[u8]>,
}

impl BytesLogSource {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

#[async_trait]
impl LogSource for BytesLogSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    async fn open(&self) -> Result<LogReader, IngestError> {
        Ok(Box::new(Cursor::new(Arc::clone(&self.data))))
    }
}

/// Row accounting for one ingestion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows: usize,
    pub accepted: usize,
    pub skipped: usize,
}

/// Builds a race from `source`. Never fails: a transport failure is logged
/// and yields an empty race.
#[instrument(level = "info", skip(source), fields(source = %source.describe()))]
pub async fn ingest(source: &dyn LogSource, track_width: u32) -> Race {
    match source.open().await {
        Ok(reader) => ingest_reader(reader, track_width).await.0,
        Err(e) => {
            error!("Failed to fetch race log: {e}");
            Race::empty(track_width)
        }
    }
}

/// Reads rows until end of stream. Rows are split on raw bytes so a row
/// that is not UTF-8 is skipped like any other malformed row. Only an I/O
/// error ends ingestion early, keeping the rows already accepted.
pub async fn ingest_reader<R>(reader: R, track_width: u32) -> (Race, IngestStats)
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = IngestStats::default();
    let mut records = Vec::new();
    let mut segments = reader.split(b'\n');

    loop {
        let bytes = match segments.next_segment().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => break,
            Err(e) => {
                warn!("Race log read failed after {} rows: {e}", stats.rows);
                break;
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        stats.rows += 1;

        let parsed = String::from_utf8(bytes)
            .map_err(|_| RowError::Encoding)
            .and_then(|line| line.parse::<RaceRecord>());
        match parsed {
            Ok(record) => {
                stats.accepted += 1;
                records.push(record);
            }
            Err(e) => {
                stats.skipped += 1;
                debug!("Skipping row {}: {e}", stats.rows);
            }
        }
    }

    let race = Race::new(records, track_width);
    info!(
        records = race.len(),
        skipped = stats.skipped,
        max_value = race.max_aggregate_distance(),
        scale = race.scale(),
        "Race log ingested"
    );
    (race, stats)
}
