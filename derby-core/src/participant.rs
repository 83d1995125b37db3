//! ## derby-core::participant
//! **Per-contestant race state and the shared roster handle**
//!
//! Single-writer contract: during a race only the simulation stepper takes
//! the write lock, once per tick, so readers never observe a partially
//! applied batch. The render loop and winner resolver only read.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use crate::race::Race;
use crate::style::VisualStyle;

/// One configured contestant, before any race state exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub display_name: String,
    pub key: String,
    #[serde(default)]
    pub style: VisualStyle,
    /// Top of the participant's lane in pixels.
    #[serde(default)]
    pub lane_y: u32,
}

impl RosterEntry {
    pub fn new(display_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            key: key.into(),
            style: VisualStyle::default(),
            lane_y: 0,
        }
    }

    pub fn with_style(mut self, style: VisualStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_lane(mut self, lane_y: u32) -> Self {
        self.lane_y = lane_y;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
    key: String,
    display_name: String,
    style: VisualStyle,
    lane_y: u32,
    boundary: u32,
    cumulative_distance: u64,
    position: u32,
}

impl Participant {
    /// Fresh state for `entry`. The boundary reserves the sprite's width so
    /// the sprite never leaves the track.
    pub fn new(entry: &RosterEntry, track_width: u32) -> Self {
        Self {
            key: entry.key.clone(),
            display_name: entry.display_name.clone(),
            style: entry.style.clone(),
            lane_y: entry.lane_y,
            boundary: track_width.saturating_sub(entry.style.width()),
            cumulative_distance: 0,
            position: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn style(&self) -> &VisualStyle {
        &self.style
    }

    pub fn lane_y(&self) -> u32 {
        self.lane_y
    }

    pub fn boundary(&self) -> u32 {
        self.boundary
    }

    pub fn cumulative_distance(&self) -> u64 {
        self.cumulative_distance
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn at_boundary(&self) -> bool {
        self.position >= self.boundary
    }

    /// Applies one distance increment.
    ///
    /// Distance always accumulates. Position is only recomputed while the
    /// *previous* position is short of the boundary.
    pub fn advance(&mut self, distance_delta: u64, race: &Race) {
        self.cumulative_distance = self.cumulative_distance.saturating_add(distance_delta);
        if !self.at_boundary() {
            self.position = race.position_for(self.cumulative_distance, self.boundary);
        }
    }

    pub fn view(&self) -> ParticipantView {
        ParticipantView {
            key: self.key.clone(),
            style: self.style.clone(),
            lane_y: self.lane_y,
            position: self.position,
        }
    }
}

/// What the renderer needs from a participant for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantView {
    pub key: String,
    pub style: VisualStyle,
    pub lane_y: u32,
    pub position: u32,
}

/// Shared handle to the participant set of one race.
#[derive(Clone, Debug, Default)]
pub struct SharedRoster {
    inner: Arc<RwLock<Vec<Participant>>>,
}

impl SharedRoster {
    pub fn new(entries: &[RosterEntry], track_width: u32) -> Self {
        let participants = entries
            .iter()
            .map(|entry| Participant::new(entry, track_width))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(participants)),
        }
    }

    /// Creates new handle to the same participant set.
    #[inline]
    pub fn share(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Copies render state; the read lock is released before returning.
    pub fn snapshot(&self) -> Vec<ParticipantView> {
        self.inner.read().iter().map(Participant::view).collect()
    }

    /// Copies full participant state in roster order.
    pub fn participants(&self) -> Vec<Participant> {
        self.inner.read().clone()
    }

    /// Write access for the stepper. Hold the guard for one whole batch.
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<Participant>> {
        self.inner.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RaceRecord;
    use crate::style::Rgb;
    use chrono::NaiveDateTime;

    fn race(width: u32, deltas: &[(&str, u64)]) -> Race {
        let records = deltas
            .iter()
            .map(|(k, d)| RaceRecord::new(NaiveDateTime::default(), *k, *d))
            .collect();
        Race::new(records, width)
    }

    #[test]
    fn boundary_reserves_sprite_width() {
        let entry = RosterEntry::new("Alice", "alice").with_style(VisualStyle::Fill {
            color: Rgb::ORANGE,
            width: 150,
            height: 150,
        });
        assert_eq!(Participant::new(&entry, 1280).boundary(), 1130);
        assert_eq!(Participant::new(&entry, 100).boundary(), 0);
    }

    #[test]
    fn stops_moving_at_boundary_but_keeps_accumulating() {
        let race = race(10, &[("alice", 100)]);
        assert_eq!(race.scale(), 10);
        let mut alice = Participant::new(&RosterEntry::new("Alice", "alice"), 10);

        alice.advance(60, &race);
        assert_eq!(alice.position(), 6);
        alice.advance(60, &race);
        assert_eq!(alice.position(), 10);
        assert!(alice.at_boundary());
        alice.advance(500, &race);
        assert_eq!(alice.position(), 10);
        assert_eq!(alice.cumulative_distance(), 620);
    }

    #[test]
    fn snapshot_is_detached_from_live_state() {
        let race = race(1, &[("alice", 2)]);
        let roster = SharedRoster::new(&[RosterEntry::new("Alice", "alice")], 1);
        let before = roster.snapshot();

        roster.write()[0].advance(2, &race);

        assert_eq!(before[0].position, 0);
        assert_eq!(roster.snapshot()[0].position, 1);
        assert_eq!(roster.share().participants()[0].cumulative_distance(), 2);
    }
}
