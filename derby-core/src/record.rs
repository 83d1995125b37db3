//! Race log records.

use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::RowError;

/// Timestamp layout used by race logs, e.g. `2024-01-01 00:00:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One distance increment for one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceRecord {
    pub timestamp: NaiveDateTime,
    pub participant_key: String,
    pub distance_delta: u64,
}

impl RaceRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        participant_key: impl Into<String>,
        distance_delta: u64,
    ) -> Self {
        Self {
            timestamp,
            participant_key: participant_key.into(),
            distance_delta,
        }
    }
}

impl FromStr for RaceRecord {
    type Err = RowError;

    /// Parses a `timestamp,participantKey,distanceDelta` row.
    fn from_str(row: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = row.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(RowError::FieldCount(fields.len()));
        }

        let timestamp = NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT)
            .map_err(|_| RowError::Timestamp(fields[0].to_string()))?;

        if fields[1].is_empty() {
            return Err(RowError::EmptyKey);
        }

        let distance_delta = fields[2]
            .parse::<u64>()
            .map_err(|_| RowError::Distance(fields[2].to_string()))?;

        Ok(Self::new(timestamp, fields[1], distance_delta))
    }
}
