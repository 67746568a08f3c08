//! Content store trait — the record store the feed engine reads candidates from.
//!
//! The store owns the lifecycle of articles and campaign-reviews. The engine
//! only needs one query shape: items of a kind and sponsorship, optionally
//! filtered by company and category, newest first, bounded.

use crate::content::{ContentItem, ContentKind};
use crate::error::StoreError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One candidate-pool query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuery {
    pub kind: ContentKind,

    pub sponsored: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    /// Only articles carry a category; a category filter on a
    /// campaign-review query matches nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    pub limit: usize,
}

impl ItemQuery {
    pub fn new(kind: ContentKind, sponsored: bool, limit: usize) -> Self {
        Self {
            kind,
            sponsored,
            company_id: None,
            category_id: None,
            limit,
        }
    }

    pub fn company(mut self, company_id: Option<&str>) -> Self {
        self.company_id = company_id.map(str::to_string);
        self
    }

    pub fn category(mut self, category_id: Option<&str>) -> Self {
        self.category_id = category_id.map(str::to_string);
        self
    }

    /// Whether `item` satisfies every predicate except the limit.
    pub fn matches(&self, item: &ContentItem) -> bool {
        item.kind() == self.kind
            && item.is_sponsored() == self.sponsored
            && self
                .company_id
                .as_deref()
                .is_none_or(|c| item.company_id() == Some(c))
            && self
                .category_id
                .as_deref()
                .is_none_or(|c| item.category_id() == Some(c))
    }
}

/// The core ContentStore trait.
///
/// Implementations: SQLite, in-memory (for testing), none (always empty).
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory", "none").
    fn name(&self) -> &str;

    /// Items matching `query`, ordered by [`ContentItem::newest_first`],
    /// at most `query.limit` of them.
    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ContentItem>, StoreError>;

    /// Insert or replace an item, keyed by kind and id.
    async fn insert(&self, item: ContentItem) -> Result<(), StoreError>;

    /// Total number of stored items.
    async fn count(&self) -> Result<usize, StoreError>;
}
