//! ## derby-engine::coordinator
//! **One race from start signal to presented result**
//!
//! The coordinator owns nothing across races except the surface and the
//! presenter. Each `run` builds fresh participants, so repeated races on the
//! same log start from zero.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use derby_config::{RaceConfig, RenderConfig};
use derby_core::participant::{RosterEntry, SharedRoster};
use derby_core::Race;
use derby_render::{SharedSurface, Surface};
use derby_telemetry::MetricsRecorder;

use crate::error::RaceError;
use crate::presenter::Presenter;
use crate::render_loop::RenderLoop;
use crate::stepper::{Completion, SimulationStepper};
use crate::winner::{RaceResult, WinnerResolver};

/// Final state of one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub key: String,
    pub display_name: String,
    pub cumulative_distance: u64,
    pub position: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceOutcome {
    pub winner: Option<RaceResult>,
    /// Greatest distance first; equal distances keep roster order.
    pub standings: Vec<Standing>,
    pub ticks: u64,
    pub frames: u64,
    pub elapsed: Duration,
}

pub struct RaceCoordinator<S: Surface> {
    race_config: RaceConfig,
    render_config: RenderConfig,
    surface: SharedSurface<S>,
    presenter: Arc<dyn Presenter>,
    metrics: MetricsRecorder,
    shutdown: CancellationToken,
}

impl<S: Surface + 'static> RaceCoordinator<S> {
    pub fn new(
        race_config: RaceConfig,
        render_config: RenderConfig,
        surface: SharedSurface<S>,
        presenter: Arc<dyn Presenter>,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            race_config,
            render_config,
            surface,
            presenter,
            metrics,
            shutdown: CancellationToken::new(),
        }
    }

    /// Races are interrupted when `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Cancelling this token interrupts a race in progress.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(records = race.len(), participants = roster.len())
    )]
    pub async fn run(
        &self,
        race: Arc<Race>,
        roster: &[RosterEntry],
    ) -> Result<RaceOutcome, RaceError> {
        let started = Instant::now();
        let participants = SharedRoster::new(roster, race.track_width());

        let (stepper, completion) = SimulationStepper::new(
            race,
            participants.share(),
            self.race_config.records_per_tick,
            self.metrics.clone(),
        );
        let stepper = stepper.spawn(Duration::from_millis(self.race_config.tick_interval_ms));

        let frame_cancel = self.shutdown.child_token();
        let period = frame_period(self.render_config.frame_rate_hz);
        let render = RenderLoop::new(
            participants.share(),
            self.surface.clone(),
            &self.render_config,
            self.metrics.clone(),
        )
        .spawn(period, frame_cancel.clone());

        let completion = self.await_completion(completion).await;

        // Aborting a finished task is a no-op.
        stepper.abort();
        frame_cancel.cancel();
        let frames = render.await?;
        let Completion { ticks, .. } = completion?;

        let finished = participants.participants();
        for p in &finished {
            debug!(
                key = p.key(),
                name = p.display_name(),
                distance = p.cumulative_distance(),
                position = p.position(),
                at_boundary = p.at_boundary(),
                "Participant final state"
            );
        }

        let winner = WinnerResolver::resolve(&finished);
        let mut standings: Vec<Standing> = finished
            .iter()
            .map(|p| Standing {
                key: p.key().to_string(),
                display_name: p.display_name().to_string(),
                cumulative_distance: p.cumulative_distance(),
                position: p.position(),
            })
            .collect();
        standings.sort_by(|a, b| b.cumulative_distance.cmp(&a.cumulative_distance));

        let elapsed = started.elapsed();
        self.metrics.races.inc();
        self.metrics.race_duration_ms.observe(elapsed.as_secs_f64() * 1_000.0);

        let outcome = RaceOutcome {
            winner,
            standings,
            ticks,
            frames,
            elapsed,
        };
        match &outcome.winner {
            Some(w) => info!(
                "Winner: {} ({}) with {}",
                w.winner_display_name, w.winner_key, w.winner_distance
            ),
            None => info!("Race finished without a winner"),
        }

        self.presenter.present(&outcome);
        if outcome.winner.is_some() {
            self.presenter.easter_egg();
        }
        Ok(outcome)
    }

    async fn await_completion(
        &self,
        completion: oneshot::Receiver<Completion>,
    ) -> Result<Completion, RaceError> {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(RaceError::Interrupted),
            signal = completion => signal.map_err(|_| RaceError::StepperDropped),
        }
    }
}

fn frame_period(frame_rate_hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(frame_rate_hz.max(1)))
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use tracing_test::traced_test;

    use super::*;
    use derby_core::record::RaceRecord;
    use derby_render::RecordingSurface;

    #[derive(Default)]
    struct CapturingPresenter {
        outcomes: Mutex<Vec<RaceOutcome>>,
        eggs: Mutex<u32>,
    }

    impl Presenter for CapturingPresenter {
        fn present(&self, outcome: &RaceOutcome) {
            self.outcomes.lock().push(outcome.clone());
        }

        fn easter_egg(&self) {
            *self.eggs.lock() += 1;
        }
    }

    fn record(key: &str, delta: u64) -> RaceRecord {
        RaceRecord::new(chrono::NaiveDateTime::default(), key, delta)
    }

    fn roster() -> Vec<RosterEntry> {
        vec![
            RosterEntry::new("Alice", "alice"),
            RosterEntry::new("Bob", "bob"),
        ]
    }

    fn coordinator(
        presenter: Arc<CapturingPresenter>,
    ) -> (RaceCoordinator<RecordingSurface>, SharedSurface<RecordingSurface>) {
        let surface = Arc::new(Mutex::new(RecordingSurface::new(2)));
        let coordinator = RaceCoordinator::new(
            RaceConfig::default(),
            RenderConfig::default(),
            surface.clone(),
            presenter,
            MetricsRecorder::new(),
        );
        (coordinator, surface)
    }

    fn alice_bob_log(track_width: u32) -> Arc<Race> {
        let records = vec![
            record("alice", 100),
            record("bob", 50),
            record("alice", 100),
        ];
        Arc::new(Race::new(records, track_width))
    }

    #[traced_test]
    #[tokio::test(start_paused = true)]
    async fn wide_track_race_has_zero_scale_and_alice_wins() {
        let presenter = Arc::new(CapturingPresenter::default());
        let (coordinator, surface) = coordinator(presenter.clone());

        let outcome = coordinator
            .run(alice_bob_log(600), &roster())
            .await
            .unwrap();

        assert_eq!(
            outcome.winner,
            Some(RaceResult {
                winner_key: "alice".into(),
                winner_display_name: "Alice".into(),
                winner_distance: 200,
            })
        );
        assert_eq!(outcome.ticks, 1);
        assert_eq!(outcome.elapsed, Duration::from_millis(10));
        assert!(outcome.standings.iter().all(|s| s.position == 0));
        assert_eq!(outcome.standings[1].cumulative_distance, 50);
        assert!(outcome.frames >= 1);
        assert_eq!(surface.lock().presented(), outcome.frames);

        assert_eq!(presenter.outcomes.lock().len(), 1);
        assert_eq!(*presenter.eggs.lock(), 1);
        assert!(logs_contain("Participant final state"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_race_finishes_without_winner() {
        let presenter = Arc::new(CapturingPresenter::default());
        let (coordinator, _surface) = coordinator(presenter.clone());

        let outcome = coordinator
            .run(Arc::new(Race::empty(600)), &roster())
            .await
            .unwrap();

        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.ticks, 1);
        assert_eq!(*presenter.eggs.lock(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_runs_start_from_fresh_state() {
        let presenter = Arc::new(CapturingPresenter::default());
        let (coordinator, _surface) = coordinator(presenter.clone());
        let race = alice_bob_log(1);

        let first = coordinator.run(race.clone(), &roster()).await.unwrap();
        let second = coordinator.run(race, &roster()).await.unwrap();

        assert_eq!(first.standings, second.standings);
        assert_eq!(second.standings[0].cumulative_distance, 200);
        assert_eq!(second.standings[0].position, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_tick_interval_still_completes() {
        let presenter = Arc::new(CapturingPresenter::default());
        let surface = Arc::new(Mutex::new(RecordingSurface::new(2)));
        let race_config = RaceConfig {
            tick_interval_ms: 0,
            records_per_tick: 1,
            ..RaceConfig::default()
        };
        let coordinator = RaceCoordinator::new(
            race_config,
            RenderConfig::default(),
            surface,
            presenter,
            MetricsRecorder::new(),
        );

        let outcome = coordinator
            .run(alice_bob_log(600), &roster())
            .await
            .unwrap();
        assert_eq!(outcome.ticks, 3);
        assert_eq!(outcome.elapsed, Duration::from_millis(3));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_race() {
        let presenter = Arc::new(CapturingPresenter::default());
        let (coordinator, _surface) = coordinator(presenter.clone());
        let records = (0..1_000).map(|_| record("alice", 1)).collect();
        let race = Arc::new(Race::new(records, 600));

        let shutdown = coordinator.shutdown_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(25)).await;
            shutdown.cancel();
        });

        let result = coordinator.run(race, &roster()).await;
        assert!(matches!(result, Err(RaceError::Interrupted)));
        assert!(presenter.outcomes.lock().is_empty());
    }
}
