use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum RaceError {
    #[error("Simulation stepper stopped before signalling completion")]
    StepperDropped,

    #[error("Race interrupted by shutdown")]
    Interrupted,

    #[error("Race task failed: {0}")]
    Join(#[from] JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
