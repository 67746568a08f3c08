//! Pool merging — one organic and one sponsored stream, regardless of kind.

use crate::candidates::CandidatePools;
use feedmix_core::ContentItem;

/// Organic and sponsored streams, each in [`ContentItem::newest_first`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedStreams {
    pub organic: Vec<ContentItem>,
    pub sponsored: Vec<ContentItem>,
}

pub struct PoolMerger;

impl PoolMerger {
    /// Merge same-polarity pools: organic articles with organic reviews,
    /// sponsored articles with sponsored reviews.
    pub fn merge(pools: CandidatePools) -> MergedStreams {
        MergedStreams {
            organic: merge_by_recency(pools.organic_articles, pools.organic_reviews),
            sponsored: merge_by_recency(pools.sponsored_articles, pools.sponsored_reviews),
        }
    }
}

/// Concatenate and sort newest first. Equal timestamps fall back to id
/// descending, so output never depends on input order.
pub fn merge_by_recency(first: Vec<ContentItem>, second: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut merged = first;
    merged.extend(second);
    merged.sort_by(ContentItem::newest_first);
    merged
}
