//! Hand-off of the race outcome to whoever shows it.

use tracing::info;

use crate::coordinator::RaceOutcome;

pub trait Presenter: Send + Sync {
    fn present(&self, outcome: &RaceOutcome);

    /// Cosmetic extra shown with a winner. No-op unless overridden.
    fn easter_egg(&self) {}
}

/// Prints the winner line to stdout and logs the outcome.
#[derive(Clone, Debug, Default)]
pub struct LogPresenter {
    easter_egg_url: Option<String>,
}

impl LogPresenter {
    pub fn new(easter_egg_url: Option<String>) -> Self {
        Self { easter_egg_url }
    }
}

/// Winner line, e.g. `Alice is the winner with alice!`.
pub fn winner_message(outcome: &RaceOutcome) -> String {
    match &outcome.winner {
        Some(result) => format!(
            "{} is the winner with {}!",
            result.winner_display_name, result.winner_key
        ),
        None => "Race complete, nobody moved.".to_string(),
    }
}

impl Presenter for LogPresenter {
    fn present(&self, outcome: &RaceOutcome) {
        info!(
            ticks = outcome.ticks,
            frames = outcome.frames,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "Race complete"
        );
        for (place, standing) in outcome.standings.iter().enumerate() {
            info!(
                "  {}. {} ({}) distance={} position={}",
                place + 1,
                standing.display_name,
                standing.key,
                standing.cumulative_distance,
                standing.position
            );
        }
        println!("{}", winner_message(outcome));
    }

    fn easter_egg(&self) {
        if let Some(url) = &self.easter_egg_url {
            println!("{url}");
        }
    }
}
