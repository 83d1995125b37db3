//! Simulation timing and track geometry.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// Period of the simulation tick in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    #[validate(range(min = 1, max = 10_000))]
    pub tick_interval_ms: u64,

    /// Maximum log records applied per tick.
    #[serde(default = "default_records_per_tick")]
    #[validate(range(min = 1, max = 1_000_000))]
    pub records_per_tick: usize,

    /// Track width in pixels; also the divisor for the distance scale.
    #[serde(default = "default_track_width")]
    #[validate(range(min = 1, max = 16_384))]
    pub track_width: u32,
}

fn default_tick_interval_ms() -> u64 {
    10
}

fn default_records_per_tick() -> usize {
    100
}

fn default_track_width() -> u32 {
    1280
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            records_per_tick: default_records_per_tick(),
            track_width: default_track_width(),
        }
    }
}
