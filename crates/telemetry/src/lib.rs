//! Feed metrics for feedmix.
//!
//! Every [`MetricsReporter`] here consumes the one [`FeedMetrics`] record
//! the pipeline emits per assembled feed: a structured-log sink, a
//! JSON-lines file sink, and the in-process [`MetricsEngine`] that backs the
//! `/v1/metrics` endpoints.

pub mod engine;
pub mod fanout;
pub mod jsonl;
pub mod log;

pub use engine::{MetricsEngine, MetricsSnapshot};
pub use fanout::{FanoutReporter, NoopReporter};
pub use jsonl::JsonLinesReporter;
pub use log::{LogReporter, METRICS_TARGET};

use feedmix_config::{MetricsSink, TelemetryConfig};
use feedmix_core::{FeedMetrics, MetricsError, MetricsReporter};
use std::sync::Arc;
use tracing::info;

/// Build the reporter described by `config`.
///
/// When telemetry is enabled, `engine` always receives records alongside
/// the configured sink. When disabled, records are dropped.
pub fn build_reporter(
    config: &TelemetryConfig,
    engine: Arc<MetricsEngine>,
) -> Result<Arc<dyn MetricsReporter>, MetricsError> {
    if !config.enabled {
        info!("Feed metrics disabled");
        return Ok(Arc::new(NoopReporter));
    }

    let mut reporters: Vec<Arc<dyn MetricsReporter>> = vec![engine];
    match config.sink {
        MetricsSink::Log => reporters.push(Arc::new(LogReporter)),
        MetricsSink::Jsonl => {
            let path = config.resolved_jsonl_path();
            reporters.push(Arc::new(JsonLinesReporter::open(&path)?));
            info!(path = %path.display(), "Writing feed metrics as JSON lines");
        }
        MetricsSink::None => {}
    }

    Ok(Arc::new(FanoutReporter::new(reporters)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_builds_noop() {
        let config = TelemetryConfig {
            enabled: false,
            ..TelemetryConfig::default()
        };
        let engine = Arc::new(MetricsEngine::new());
        let reporter = build_reporter(&config, engine.clone()).unwrap();
        assert_eq!(reporter.name(), "none");

        reporter.report(&FeedMetrics::new(1)).unwrap();
        assert_eq!(engine.snapshot().feeds_served, 0);
    }

    #[test]
    fn enabled_feeds_engine() {
        let engine = Arc::new(MetricsEngine::new());
        let reporter = build_reporter(&TelemetryConfig::default(), engine.clone()).unwrap();
        reporter.report(&FeedMetrics::new(1)).unwrap();
        assert_eq!(engine.snapshot().feeds_served, 1);
    }

    #[test]
    fn jsonl_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed-metrics.jsonl");
        let config = TelemetryConfig {
            sink: MetricsSink::Jsonl,
            jsonl_path: Some(path.clone()),
            ..TelemetryConfig::default()
        };

        let engine = Arc::new(MetricsEngine::new());
        let reporter = build_reporter(&config, engine.clone()).unwrap();
        reporter.report(&FeedMetrics::new(4)).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert_eq!(engine.snapshot().feeds_served, 1);
    }
}
