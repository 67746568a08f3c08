//! Reporter combinators.

use feedmix_core::{FeedMetrics, MetricsError, MetricsReporter};
use std::sync::Arc;

/// Forwards every record to each inner reporter.
///
/// All reporters are tried even when one fails; the first error is returned.
pub struct FanoutReporter {
    reporters: Vec<Arc<dyn MetricsReporter>>,
}

impl FanoutReporter {
    pub fn new(reporters: Vec<Arc<dyn MetricsReporter>>) -> Self {
        Self { reporters }
    }
}

impl MetricsReporter for FanoutReporter {
    fn name(&self) -> &str {
        "fanout"
    }

    fn report(&self, metrics: &FeedMetrics) -> Result<(), MetricsError> {
        let mut first_error = None;
        for reporter in &self.reporters {
            if let Err(e) = reporter.report(metrics) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl MetricsReporter for NoopReporter {
    fn name(&self) -> &str {
        "none"
    }

    fn report(&self, _metrics: &FeedMetrics) -> Result<(), MetricsError> {
        Ok(())
    }
}
