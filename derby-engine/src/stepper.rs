//! ## derby-engine::stepper
//! **Fixed-rate simulation clock**
//!
//! Each tick applies at most `records_per_tick` log records, in log order,
//! under a single write lock on the roster. When the cursor reaches the end
//! of the log the stepper moves to `Done` and fires its completion signal.
//! `Done` is terminal: later ticks neither apply records nor re-signal.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, info_span, trace, Instrument};

use derby_core::participant::SharedRoster;
use derby_core::Race;
use derby_telemetry::MetricsRecorder;

pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepperState {
    Running,
    Done,
}

/// Payload of the one-shot completion signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub ticks: u64,
    pub records: usize,
}

/// What a single tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub applied: usize,
    pub unmatched: usize,
    pub completed: bool,
}

#[derive(Debug, Default)]
struct SimulationCursor {
    next_index: usize,
    done: bool,
}

pub struct SimulationStepper {
    race: Arc<Race>,
    roster: SharedRoster,
    key_index: HashMap<String, usize>,
    cursor: SimulationCursor,
    records_per_tick: usize,
    ticks: u64,
    completion: Option<oneshot::Sender<Completion>>,
    metrics: MetricsRecorder,
}

impl SimulationStepper {
    /// Returns the stepper and the receiving half of its completion signal.
    pub fn new(
        race: Arc<Race>,
        roster: SharedRoster,
        records_per_tick: usize,
        metrics: MetricsRecorder,
    ) -> (Self, oneshot::Receiver<Completion>) {
        let key_index = roster
            .participants()
            .iter()
            .enumerate()
            .map(|(i, p)| (p.key().to_string(), i))
            .collect();
        let (tx, rx) = oneshot::channel();

        let stepper = Self {
            race,
            roster,
            key_index,
            cursor: SimulationCursor::default(),
            records_per_tick: records_per_tick.max(1),
            ticks: 0,
            completion: Some(tx),
            metrics,
        };
        (stepper, rx)
    }

    pub fn state(&self) -> StepperState {
        if self.cursor.done {
            StepperState::Done
        } else {
            StepperState::Running
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Runs one tick.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if self.cursor.done {
            return report;
        }

        self.ticks += 1;
        self.metrics.ticks.inc();
        let records = self.race.records();

        {
            let mut participants = self.roster.write();
            for _ in 0..self.records_per_tick {
                let Some(record) = records.get(self.cursor.next_index) else {
                    break;
                };
                self.cursor.next_index += 1;

                match self.key_index.get(&record.participant_key) {
                    Some(&slot) => {
                        participants[slot].advance(record.distance_delta, &self.race);
                        report.applied += 1;
                    }
                    None => report.unmatched += 1,
                }
            }
        }

        self.metrics.records_applied.inc_by(report.applied as f64);
        self.metrics
            .records_unmatched
            .inc_by(report.unmatched as f64);
        trace!(
            tick = self.ticks,
            applied = report.applied,
            unmatched = report.unmatched,
            "Tick applied"
        );

        if self.cursor.next_index >= records.len() {
            self.finish();
            report.completed = true;
        }
        report
    }

    fn finish(&mut self) {
        self.cursor.done = true;
        if let Some(tx) = self.completion.take() {
            info!(
                "Stepper complete after {} ticks, {} records",
                self.ticks, self.cursor.next_index
            );
            let completion = Completion {
                ticks: self.ticks,
                records: self.cursor.next_index,
            };
            if tx.send(completion).is_err() {
                debug!("Completion receiver already dropped");
            }
        }
    }

    /// Drives `tick` every `period` until the log is exhausted. The first
    /// tick fires one period after spawning. A zero period is raised to
    /// `MIN_TICK_PERIOD`.
    pub fn spawn(mut self, period: Duration) -> JoinHandle<()> {
        let period = period.max(MIN_TICK_PERIOD);
        tokio::spawn(
            async move {
                let mut interval = interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if self.tick().completed {
                        break;
                    }
                }
            }
            .instrument(info_span!("simulation_stepper")),
        )
    }
}
