//! # Derby Telemetry
//!
//! Structured logging and Prometheus metrics for race runs.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
