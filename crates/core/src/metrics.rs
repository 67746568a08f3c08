//! Feed metrics — the one observability record emitted per assembled feed.

use crate::error::MetricsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timing and composition of one assembled feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedMetrics {
    /// Unique id of this feed assembly, for log correlation.
    pub feed_id: String,
    /// When the pipeline finished.
    pub recorded_at: DateTime<Utc>,
    /// Wall-clock duration of fetch + merge + assemble.
    pub duration_ms: u64,
    /// Items in the returned feed.
    pub total_items: usize,
    /// Sponsored items in the returned feed.
    pub sponsored_included: usize,
    /// Size of the merged organic stream.
    pub organic_pool: usize,
    /// Size of the merged sponsored stream.
    pub sponsored_pool: usize,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl FeedMetrics {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            feed_id: Uuid::new_v4().to_string(),
            recorded_at: Utc::now(),
            duration_ms,
            total_items: 0,
            sponsored_included: 0,
            organic_pool: 0,
            sponsored_pool: 0,
            company_id: None,
            category_id: None,
        }
    }
}

/// Sink for [`FeedMetrics`].
///
/// Injected into the pipeline so it can be swapped or disabled without
/// touching the assembly algorithm. Errors are logged by the caller and
/// never affect the feed. Implementations must return an error rather
/// than panic.
pub trait MetricsReporter: Send + Sync {
    /// Reporter name (e.g., "log", "jsonl", "engine").
    fn name(&self) -> &str;

    /// Record one feed.
    fn report(&self, metrics: &FeedMetrics) -> Result<(), MetricsError>;
}
