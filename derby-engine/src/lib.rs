//! # derby-engine
//!
//! Drives a race over an ingested log: a fixed-rate simulation stepper
//! writes participant state, an independent render loop draws it, and the
//! coordinator joins both and resolves the winner.
//!
//! ### Key Submodules:
//! - `stepper`: tick-driven batch application of log records
//! - `render_loop`: frame-rate redraw with a configurable erase strategy
//! - `winner`: winner selection with roster-order tie-break
//! - `coordinator`: lifecycle of one race
//! - `presenter`: result hand-off
//! - `runtime`: frontend entry points

pub mod coordinator;
pub mod error;
pub mod presenter;
pub mod render_loop;
pub mod runtime;
pub mod stepper;
pub mod winner;

pub use coordinator::{RaceCoordinator, RaceOutcome, Standing};
pub use error::RaceError;
pub use presenter::{LogPresenter, Presenter};
pub use runtime::{run_race_mode, RaceOptions};
pub use winner::{RaceResult, WinnerResolver};
