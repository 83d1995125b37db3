//! # derby-core
//!
//! Data model for log-driven races.
//!
//! ### Key Submodules:
//! - `record`: a single timestamped distance increment and its row parser
//! - `race`: the immutable ordered log plus derived scale
//! - `participant`: per-contestant race state and the shared roster handle
//! - `ingest`: log sources and CSV ingestion into a `Race`
//! - `style`: visual style of a participant on the track

pub mod error;
pub mod ingest;
pub mod participant;
pub mod race;
pub mod record;
pub mod style;

pub use error::{IngestError, RowError};
pub use race::Race;
