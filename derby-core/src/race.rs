//! ## derby-core::race
//! **Immutable race log with derived scale**
//!
//! The scale (distance units per pixel) is fixed when the race is built:
//! the largest per-participant total divided by the track width, floored.
//! A zero scale pins every position at 0.

use std::collections::HashMap;

use crate::record::RaceRecord;

#[derive(Clone, Debug, Default)]
pub struct Race {
    records: Vec<RaceRecord>,
    totals: HashMap<String, u64>,
    max_aggregate_distance: u64,
    scale: u64,
    track_width: u32,
}

impl Race {
    /// Builds a race from records in log order.
    pub fn new(records: Vec<RaceRecord>, track_width: u32) -> Self {
        let mut totals: HashMap<String, u64> = HashMap::new();
        for record in &records {
            *totals.entry(record.participant_key.clone()).or_default() += record.distance_delta;
        }

        let max_aggregate_distance = totals.values().copied().max().unwrap_or(0);
        let scale = if track_width == 0 {
            0
        } else {
            max_aggregate_distance / u64::from(track_width)
        };

        Self {
            records,
            totals,
            max_aggregate_distance,
            scale,
            track_width,
        }
    }

    /// A race with no records. Completes on its first tick.
    pub fn empty(track_width: u32) -> Self {
        Self::new(Vec::new(), track_width)
    }

    #[inline]
    pub fn records(&self) -> &[RaceRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn max_aggregate_distance(&self) -> u64 {
        self.max_aggregate_distance
    }

    #[inline]
    pub fn scale(&self) -> u64 {
        self.scale
    }

    #[inline]
    pub fn track_width(&self) -> u32 {
        self.track_width
    }

    /// Sum of all deltas logged for `key`.
    pub fn total_for(&self, key: &str) -> u64 {
        self.totals.get(key).copied().unwrap_or(0)
    }

    /// Pixel offset for a cumulative distance, clamped to `boundary`.
    pub fn position_for(&self, cumulative_distance: u64, boundary: u32) -> u32 {
        if self.scale == 0 {
            return 0;
        }
        let pixels = cumulative_distance / self.scale;
        pixels.min(u64::from(boundary)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(key: &str, delta: u64) -> RaceRecord {
        RaceRecord::new(chrono::NaiveDateTime::default(), key, delta)
    }

    fn sample() -> Vec<RaceRecord> {
        vec![record("alice", 100), record("bob", 50), record("alice", 100)]
    }

    #[test]
    fn derives_max_and_truncated_scale() {
        let race = Race::new(sample(), 600);
        assert_eq!(race.max_aggregate_distance(), 200);
        assert_eq!(race.scale(), 0);
        assert_eq!(race.position_for(200, 600), 0);
    }

    #[test]
    fn narrow_track_gives_nonzero_scale() {
        let race = Race::new(sample(), 1);
        assert_eq!(race.scale(), 200);
        assert_eq!(race.position_for(100, 1), 0);
        assert_eq!(race.position_for(200, 1), 1);
        assert_eq!(race.total_for("bob"), 50);
        assert_eq!(race.total_for("nobody"), 0);
    }

    #[test]
    fn position_is_clamped_to_boundary() {
        let race = Race::new(vec![record("alice", 10_000)], 100);
        assert_eq!(race.scale(), 100);
        assert_eq!(race.position_for(10_000, 80), 80);
    }

    #[test]
    fn empty_race_has_zero_derived_fields() {
        let race = Race::empty(1280);
        assert!(race.is_empty());
        assert_eq!(race.max_aggregate_distance(), 0);
        assert_eq!(race.scale(), 0);
    }

    proptest! {
        #[test]
        fn totals_and_scale_follow_the_log(
            rows in prop::collection::vec((0usize..3, 0u64..10_000), 0..100),
            width in 1u32..2_000,
        ) {
            let keys = ["a", "b", "c"];
            let records = rows.iter().map(|(k, d)| record(keys[*k], *d)).collect();
            let race = Race::new(records, width);

            let mut max = 0;
            for (i, key) in keys.iter().enumerate() {
                let sum: u64 = rows.iter().filter(|(k, _)| *k == i).map(|(_, d)| d).sum();
                prop_assert_eq!(race.total_for(key), sum);
                max = max.max(sum);
            }
            prop_assert_eq!(race.max_aggregate_distance(), max);
            prop_assert_eq!(race.scale(), max / u64::from(width));
        }

        #[test]
        fn position_is_monotone_and_bounded(
            a in 0u64..1_000_000,
            b in 0u64..1_000_000,
            boundary in 0u32..2_000,
        ) {
            let race = Race::new(vec![record("alice", 1_000_000)], 1_000);
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(race.position_for(lo, boundary) <= race.position_for(hi, boundary));
            prop_assert!(race.position_for(hi, boundary) <= boundary);
        }
    }
}
