//! ## derby-telemetry::metrics
//! **Prometheus counters for ticks, records and frames**

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub ticks: Counter,
    pub records_applied: Counter,
    pub records_unmatched: Counter,
    pub frames_rendered: Counter,
    pub races: Counter,
    pub race_duration_ms: Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();

        // Metric names and help strings are constants, so construction
        // and registration on a fresh registry cannot fail.
        let counter = |name: &str, help: &str| {
            let c = Counter::new(name, help).expect("valid counter definition");
            registry
                .register(Box::new(c.clone()))
                .expect("unique counter name");
            c
        };

        let ticks = counter("derby_ticks_total", "Simulation ticks executed");
        let records_applied = counter(
            "derby_records_applied_total",
            "Log records applied to a participant",
        );
        let records_unmatched = counter(
            "derby_records_unmatched_total",
            "Log records whose key matched no participant",
        );
        let frames_rendered = counter(
            "derby_frames_rendered_total",
            "Frames drawn by the render loop",
        );
        let races = counter("derby_races_total", "Races run to completion");

        let race_duration_ms = Histogram::with_opts(
            HistogramOpts::new("derby_race_duration_ms", "Wall-clock duration of a race")
                .buckets(vec![10.0, 100.0, 1_000.0, 10_000.0, 60_000.0]),
        )
        .expect("valid histogram definition");
        registry
            .register(Box::new(race_duration_ms.clone()))
            .expect("unique histogram name");

        Self {
            registry,
            ticks,
            records_applied,
            records_unmatched,
            frames_rendered,
            races,
            race_duration_ms,
        }
    }

    /// Renders all metrics in the Prometheus text format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathers_registered_metrics() {
        let metrics = MetricsRecorder::new();
        metrics.ticks.inc_by(3.0);
        metrics.race_duration_ms.observe(42.0);

        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("derby_ticks_total 3"));
        assert!(text.contains("derby_race_duration_ms_count 1"));
    }

    #[test]
    fn clones_share_counters() {
        let metrics = MetricsRecorder::new();
        metrics.clone().frames_rendered.inc();
        assert_eq!(metrics.frames_rendered.get(), 1.0);
    }
}
