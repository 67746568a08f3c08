//! Feed requests and results.
//!
//! A [`FeedRequest`] carries whatever the caller asked for; out-of-range
//! values are not errors. [`FeedRequest::effective_limit`] and
//! [`FeedRequest::effective_sponsored_interval`] normalize them.

use crate::content::ContentItem;
use serde::{Deserialize, Serialize};

/// Smallest feed that can be requested.
pub const MIN_FEED_LIMIT: usize = 1;
/// Largest feed that can be requested.
pub const MAX_FEED_LIMIT: usize = 100;
/// Interleaving period used when the caller asks for a non-positive one.
pub const DEFAULT_SPONSORED_INTERVAL: usize = 4;

/// The caller's filters and paging for one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Requested page size, clamped into [1, 100].
    pub limit: i64,

    /// Requested interleaving period; non-positive means the default.
    pub sponsored_interval: i64,
}

impl FeedRequest {
    pub fn new(limit: i64) -> Self {
        Self {
            company_id: None,
            category_id: None,
            limit,
            sponsored_interval: DEFAULT_SPONSORED_INTERVAL as i64,
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_sponsored_interval(mut self, interval: i64) -> Self {
        self.sponsored_interval = interval;
        self
    }

    /// `limit` clamped into [`MIN_FEED_LIMIT`, `MAX_FEED_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit
            .clamp(MIN_FEED_LIMIT as i64, MAX_FEED_LIMIT as i64) as usize
    }

    /// `sponsored_interval` if positive, else [`DEFAULT_SPONSORED_INTERVAL`].
    pub fn effective_sponsored_interval(&self) -> usize {
        if self.sponsored_interval > 0 {
            usize::try_from(self.sponsored_interval).unwrap_or(usize::MAX)
        } else {
            DEFAULT_SPONSORED_INTERVAL
        }
    }
}

/// The assembled feed: at most `effective_limit` items, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResult {
    pub items: Vec<ContentItem>,
}

impl FeedResult {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of sponsored items that made it into the feed.
    pub fn sponsored_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_sponsored()).count()
    }

    pub fn into_items(self) -> Vec<ContentItem> {
        self.items
    }
}
