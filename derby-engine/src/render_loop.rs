//! ## derby-engine::render_loop
//! **Frame-rate redraw of participant positions**
//!
//! The render loop knows nothing about the race log or tick boundaries. Each
//! frame it copies the roster's current positions and draws them. It runs
//! until its cancellation token fires, then draws one last frame so the
//! surface shows the final standings.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, Instrument};

use derby_config::RenderConfig;
use derby_core::participant::{ParticipantView, SharedRoster};
use derby_core::style::{Rgb, VisualStyle};
use derby_render::{EraseStrategy, SharedSurface, Surface};
use derby_telemetry::MetricsRecorder;

/// Progress bar sits this far below the top of the lane.
pub const PROGRESS_BAR_OFFSET: u32 = 50;
pub const PROGRESS_BAR_HEIGHT: u32 = 10;
pub const PROGRESS_BAR_COLOR: Rgb = Rgb::ORANGE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Footprint {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Footprint {
    fn of(view: &ParticipantView) -> Self {
        Self {
            x: view.position,
            y: view.lane_y,
            width: view.style.width(),
            height: view.style.height(),
        }
    }
}

pub struct RenderLoop<S: Surface> {
    roster: SharedRoster,
    surface: SharedSurface<S>,
    erase: EraseStrategy,
    progress_bar: bool,
    previous: Vec<Footprint>,
    frames: u64,
    metrics: MetricsRecorder,
}

impl<S: Surface + 'static> RenderLoop<S> {
    pub fn new(
        roster: SharedRoster,
        surface: SharedSurface<S>,
        config: &RenderConfig,
        metrics: MetricsRecorder,
    ) -> Self {
        Self {
            roster,
            surface,
            erase: config.erase,
            progress_bar: config.progress_bar,
            previous: Vec::new(),
            frames: 0,
            metrics,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws one frame from the roster's current state.
    pub fn render_frame(&mut self) {
        // Copy first so the roster lock is never held while drawing.
        let views = self.roster.snapshot();
        let mut surface = self.surface.lock();

        match self.erase {
            EraseStrategy::Repaint => {
                surface.repaint_background();
                for view in &views {
                    if self.progress_bar && view.position > 0 {
                        surface.fill_rect(
                            0,
                            view.lane_y + PROGRESS_BAR_OFFSET,
                            view.position,
                            PROGRESS_BAR_HEIGHT,
                            PROGRESS_BAR_COLOR,
                        );
                    }
                    draw_participant(&mut *surface, view);
                }
            }
            EraseStrategy::Trail => {
                if self.frames == 0 {
                    surface.repaint_background();
                }
                let background = surface.background();
                for old in &self.previous {
                    surface.fill_rect(old.x, old.y, old.width, old.height, background);
                }
                for view in &views {
                    draw_participant(&mut *surface, view);
                }
                self.previous = views.iter().map(Footprint::of).collect();
            }
        }

        surface.present();
        self.frames += 1;
        self.metrics.frames_rendered.inc();
    }

    /// Renders every `period` until `cancel` fires. Resolves to the number
    /// of frames drawn.
    pub fn spawn(mut self, period: Duration, cancel: CancellationToken) -> JoinHandle<u64> {
        tokio::spawn(
            async move {
                let mut ticker = interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
                loop {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => self.render_frame(),
                    }
                }
                self.render_frame();
                debug!("Render loop stopped after {} frames", self.frames);
                self.frames
            }
            .instrument(info_span!("render_loop")),
        )
    }
}

fn draw_participant<S: Surface + ?Sized>(surface: &mut S, view: &ParticipantView) {
    match &view.style {
        VisualStyle::Sprite {
            asset,
            width,
            height,
        } => surface.draw_sprite(asset, view.position, view.lane_y, *width, *height),
        VisualStyle::Fill {
            color,
            width,
            height,
        } => surface.fill_rect(view.position, view.lane_y, *width, *height, *color),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use derby_core::participant::RosterEntry;
    use derby_core::record::RaceRecord;
    use derby_core::Race;
    use derby_render::{Canvas, DrawCommand, RecordingSurface};

    fn fill(color: Rgb) -> VisualStyle {
        VisualStyle::Fill {
            color,
            width: 2,
            height: 2,
        }
    }

    type Setup = (
        RenderLoop<RecordingSurface>,
        SharedSurface<RecordingSurface>,
        SharedRoster,
        Race,
    );

    fn rect(x: u32, y: u32, width: u32, height: u32, color: Rgb) -> DrawCommand {
        DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        }
    }

    fn setup(erase: EraseStrategy) -> Setup {
        let ship = VisualStyle::Sprite {
            asset: "ship2".into(),
            width: 2,
            height: 2,
        };
        let entries = [
            RosterEntry::new("Alice", "alice")
                .with_style(fill(Rgb(1, 0, 0)))
                .with_lane(0),
            RosterEntry::new("Bob", "bob")
                .with_style(ship)
                .with_lane(5),
        ];
        let roster = SharedRoster::new(&entries, 20);
        let race = Race::new(
            vec![RaceRecord::new(chrono::NaiveDateTime::default(), "alice", 40)],
            20,
        );
        let surface = Arc::new(Mutex::new(RecordingSurface::new(4)));
        let config = RenderConfig {
            erase,
            ..RenderConfig::default()
        };
        let metrics = MetricsRecorder::new();
        let render = RenderLoop::new(roster.share(), surface.clone(), &config, metrics);
        (render, surface, roster, race)
    }

    #[test]
    fn repaint_draws_background_bar_and_styles() {
        let (mut render, surface, roster, race) = setup(EraseStrategy::Repaint);
        roster.write()[0].advance(10, &race);
        render.render_frame();

        let surface = surface.lock();
        let frame = surface.last_frame().unwrap();
        assert_eq!(frame[0], DrawCommand::RepaintBackground);
        assert_eq!(frame[1], rect(0, PROGRESS_BAR_OFFSET, 5, 10, Rgb::ORANGE));
        assert_eq!(frame[2], rect(5, 0, 2, 2, Rgb(1, 0, 0)));
        assert_eq!(
            frame[3],
            DrawCommand::Sprite {
                asset: "ship2".into(),
                x: 0,
                y: 5
            }
        );
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn trail_erases_only_previous_footprints() {
        let (mut render, surface, roster, race) = setup(EraseStrategy::Trail);
        render.render_frame();
        roster.write()[0].advance(10, &race);
        render.render_frame();

        let surface = surface.lock();
        let first = &surface.frames()[0];
        assert_eq!(first[0], DrawCommand::RepaintBackground);

        let second = surface.last_frame().unwrap();
        assert!(!second.contains(&DrawCommand::RepaintBackground));
        assert_eq!(second[0], rect(0, 0, 2, 2, Rgb::BLACK));
        assert_eq!(second[2], rect(5, 0, 2, 2, Rgb(1, 0, 0)));
    }

    #[test]
    fn trail_on_canvas_leaves_no_ghost() {
        let canvas = Arc::new(Mutex::new(Canvas::new(20, 10, Rgb::BLACK)));
        let alice = RosterEntry::new("Alice", "alice").with_style(fill(Rgb(9, 9, 9)));
        let entries = [alice];
        let roster = SharedRoster::new(&entries, 20);
        let race = Race::new(
            vec![RaceRecord::new(chrono::NaiveDateTime::default(), "alice", 20)],
            20,
        );
        let config = RenderConfig {
            erase: EraseStrategy::Trail,
            ..RenderConfig::default()
        };
        let metrics = MetricsRecorder::new();
        let mut render = RenderLoop::new(roster.share(), canvas.clone(), &config, metrics);

        render.render_frame();
        roster.write()[0].advance(10, &race);
        render.render_frame();

        let canvas = canvas.lock();
        assert_eq!(canvas.pixel(0, 0), Some(Rgb::BLACK));
        assert_eq!(canvas.pixel(10, 0), Some(Rgb(9, 9, 9)));
        assert_eq!(canvas.frames(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_cancelled_then_draws_final_frame() {
        let (render, surface, _roster, _race) = setup(EraseStrategy::Repaint);
        let cancel = CancellationToken::new();
        let handle = render.spawn(Duration::from_millis(10), cancel.clone());

        tokio::time::sleep(Duration::from_millis(45)).await;
        cancel.cancel();
        let frames = handle.await.unwrap();

        // Ticks at 0, 10, 20, 30, 40 plus the final frame.
        assert_eq!(frames, 6);
        assert_eq!(surface.lock().presented(), 6);
    }
}
