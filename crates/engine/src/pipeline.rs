//! The feed pipeline — fetch, merge, assemble, report.

use crate::assembler::FeedAssembler;
use crate::candidates::CandidateSource;
use crate::merge::PoolMerger;
use feedmix_config::{FeedConfig, FetchMode, SourceFailurePolicy};
use feedmix_core::{
    ContentStore, Error, FeedMetrics, FeedRequest, FeedResult, MetricsReporter, Result,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tunables for one [`FeedPipeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    pub fetch_mode: FetchMode,
    pub failure_policy: SourceFailurePolicy,
    /// Upper bound on a whole assembly. `None` waits for the store.
    pub deadline: Option<Duration>,
}

impl PipelineOptions {
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            fetch_mode: config.fetch_mode,
            failure_policy: config.on_source_failure,
            deadline: (config.deadline_ms > 0).then(|| Duration::from_millis(config.deadline_ms)),
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Assembles feeds from a store and reports one [`FeedMetrics`] per feed.
pub struct FeedPipeline {
    source: CandidateSource,
    reporter: Arc<dyn MetricsReporter>,
    deadline: Option<Duration>,
}

impl FeedPipeline {
    pub fn new(
        store: Arc<dyn ContentStore>,
        reporter: Arc<dyn MetricsReporter>,
        options: PipelineOptions,
    ) -> Self {
        let source = CandidateSource::new(store)
            .with_fetch_mode(options.fetch_mode)
            .with_failure_policy(options.failure_policy);
        Self {
            source,
            reporter,
            deadline: options.deadline,
        }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        self.source.store()
    }

    pub fn reporter(&self) -> &Arc<dyn MetricsReporter> {
        &self.reporter
    }

    /// Build the feed for `request`.
    ///
    /// A failed candidate fetch fails the feed (unless the pipeline degrades),
    /// and no metrics are reported for it. Reporter errors and panics are
    /// logged and never reach the caller.
    pub async fn assemble_feed(&self, request: &FeedRequest) -> Result<FeedResult> {
        let started = Instant::now();

        let (result, organic_pool, sponsored_pool) = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run(request))
                .await
                .map_err(|_| {
                    warn!(
                        deadline_ms = deadline.as_millis() as u64,
                        company_id = request.company_id.as_deref(),
                        "Feed assembly abandoned at deadline"
                    );
                    Error::DeadlineExceeded {
                        after_ms: deadline.as_millis() as u64,
                    }
                })??,
            None => self.run(request).await?,
        };

        let mut metrics = FeedMetrics::new(started.elapsed().as_millis() as u64);
        metrics.total_items = result.len();
        metrics.sponsored_included = result.sponsored_count();
        metrics.organic_pool = organic_pool;
        metrics.sponsored_pool = sponsored_pool;
        metrics.company_id = request.company_id.clone();
        metrics.category_id = request.category_id.clone();

        let reported = panic::catch_unwind(AssertUnwindSafe(|| self.reporter.report(&metrics)));
        match reported {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(reporter = self.reporter.name(), error = %e, "Failed to report feed metrics");
            }
            Err(_panic) => {
                warn!(reporter = self.reporter.name(), "Metrics reporter panicked");
            }
        }

        info!(
            feed_id = %metrics.feed_id,
            items = metrics.total_items,
            sponsored = metrics.sponsored_included,
            duration_ms = metrics.duration_ms,
            "Feed assembled"
        );

        Ok(result)
    }

    /// Returns the feed plus the merged organic/sponsored stream sizes.
    async fn run(&self, request: &FeedRequest) -> Result<(FeedResult, usize, usize)> {
        let assembler = FeedAssembler::for_request(request);

        let pools = self
            .source
            .fetch(
                request.company_id.as_deref(),
                request.category_id.as_deref(),
                assembler.limit(),
            )
            .await?;

        let streams = PoolMerger::merge(pools);
        let (organic_pool, sponsored_pool) = (streams.organic.len(), streams.sponsored.len());
        debug!(
            organic_pool,
            sponsored_pool,
            interval = assembler.interval(),
            "Merged candidate streams"
        );

        let items = assembler.assemble(streams.organic, streams.sponsored);
        Ok((FeedResult::new(items), organic_pool, sponsored_pool))
    }
}
