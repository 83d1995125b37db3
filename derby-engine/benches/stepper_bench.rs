#[macro_use]
extern crate criterion;

use std::sync::Arc;

use chrono::NaiveDateTime;
use criterion::{black_box, BatchSize, Criterion};
use derby_core::participant::{RosterEntry, SharedRoster};
use derby_core::record::RaceRecord;
use derby_core::Race;
use derby_engine::stepper::{SimulationStepper, StepperState};
use derby_telemetry::MetricsRecorder;

/// Applies a 100k record log in batches of 500, as the fill-colour variant does.
fn benchmark_stepper_batches(c: &mut Criterion) {
    let keys = ["p1", "p2", "p3"];
    let records = (0..100_000u64)
        .map(|i| {
            let key = keys[(i % 3) as usize];
            RaceRecord::new(NaiveDateTime::default(), key, i % 17)
        })
        .collect();
    let race = Arc::new(Race::new(records, 1280));
    let entries: Vec<_> = keys.iter().map(|k| RosterEntry::new(*k, *k)).collect();
    let metrics = MetricsRecorder::new();

    c.bench_function("stepper_batches", |b| {
        b.iter_batched(
            || {
                let roster = SharedRoster::new(&entries, 1280);
                SimulationStepper::new(race.clone(), roster, 500, metrics.clone()).0
            },
            |mut stepper| {
                while stepper.state() == StepperState::Running {
                    black_box(stepper.tick());
                }
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, benchmark_stepper_batches);
criterion_main!(benches);
