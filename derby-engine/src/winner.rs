//! Winner selection at the end of a race.

use derby_core::participant::Participant;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceResult {
    pub winner_key: String,
    pub winner_display_name: String,
    pub winner_distance: u64,
}

pub struct WinnerResolver;

impl WinnerResolver {
    /// The participant with the greatest cumulative distance. Ties go to the
    /// earlier participant; a race where nobody moved has no winner.
    pub fn resolve(participants: &[Participant]) -> Option<RaceResult> {
        let mut best: Option<&Participant> = None;
        let mut best_distance = 0;
        for participant in participants {
            if participant.cumulative_distance() > best_distance {
                best_distance = participant.cumulative_distance();
                best = Some(participant);
            }
        }

        best.map(|p| RaceResult {
            winner_key: p.key().to_string(),
            winner_display_name: p.display_name().to_string(),
            winner_distance: p.cumulative_distance(),
        })
    }
}
