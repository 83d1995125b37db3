//! ## derby-telemetry::logging
//! **Structured logging with tracing and OpenTelemetry attributes**
//!
//! `RUST_LOG` overrides the configured default filter.

use opentelemetry::KeyValue;
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. `default_level` applies when
    /// `RUST_LOG` is unset.
    pub fn init_with_level(default_level: &str) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        // A second init (e.g. repeated test setup) keeps the first subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_thread_names(true)
            .with_span_events(FmtSpan::ENTER)
            .try_init();
    }

    #[inline]
    pub async fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!(
            "race_event",
            event_type = event_type,
            otel.kind = "INTERNAL"
        );

        async {
            tracing::info!(metadata = ?metadata, "Race event recorded");
        }
        .instrument(span)
        .await
    }
}
