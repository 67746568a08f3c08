//! Structured-log reporter.

use feedmix_core::{FeedMetrics, MetricsError, MetricsReporter};
use tracing::info;

/// Log target for feed metrics events.
pub const METRICS_TARGET: &str = "feedmix::metrics";

/// Emits one `info!` event per feed on the [`METRICS_TARGET`] target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl LogReporter {
    pub fn new() -> Self {
        Self
    }
}

impl MetricsReporter for LogReporter {
    fn name(&self) -> &str {
        "log"
    }

    fn report(&self, metrics: &FeedMetrics) -> Result<(), MetricsError> {
        info!(
            target: METRICS_TARGET,
            feed_id = %metrics.feed_id,
            duration_ms = metrics.duration_ms,
            total_items = metrics.total_items,
            sponsored_included = metrics.sponsored_included,
            organic_pool = metrics.organic_pool,
            sponsored_pool = metrics.sponsored_pool,
            company_id = metrics.company_id.as_deref(),
            category_id = metrics.category_id.as_deref(),
            "feed metrics"
        );
        Ok(())
    }
}
