//! Candidate selection — the four pools a feed is built from.
//!
//! | Pool                      | Kind            | Sponsored | Category filter | Bound     |
//! |---------------------------|-----------------|-----------|-----------------|-----------|
//! | organic articles          | article         | no        | yes             | 2 × limit |
//! | sponsored articles        | article         | yes       | yes             | limit     |
//! | organic campaign-reviews  | campaign_review | no        | no              | limit     |
//! | sponsored campaign-reviews| campaign_review | yes       | no              | limit / 2 |
//!
//! The organic-article pool is over-fetched because interleaving pushes some
//! organic candidates past the limit.

use feedmix_config::{FetchMode, SourceFailurePolicy};
use feedmix_core::{ContentItem, ContentKind, ContentStore, Error, ItemQuery, PoolKind, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Over-fetch factor for the organic-article pool.
const ORGANIC_ARTICLE_BUFFER: usize = 2;

/// The raw pools, each newest first and already filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePools {
    pub organic_articles: Vec<ContentItem>,
    pub sponsored_articles: Vec<ContentItem>,
    pub organic_reviews: Vec<ContentItem>,
    pub sponsored_reviews: Vec<ContentItem>,
}

/// Build the store query for one pool.
pub fn pool_query(
    pool: PoolKind,
    company_id: Option<&str>,
    category_id: Option<&str>,
    limit: usize,
) -> ItemQuery {
    let (kind, sponsored, bound) = match pool {
        PoolKind::OrganicArticles => (ContentKind::Article, false, limit * ORGANIC_ARTICLE_BUFFER),
        PoolKind::SponsoredArticles => (ContentKind::Article, true, limit),
        PoolKind::OrganicReviews => (ContentKind::CampaignReview, false, limit),
        PoolKind::SponsoredReviews => (ContentKind::CampaignReview, true, limit / 2),
    };

    let query = ItemQuery::new(kind, sponsored, bound).company(company_id);
    match kind {
        ContentKind::Article => query.category(category_id),
        ContentKind::CampaignReview => query,
    }
}

/// Fetches the four candidate pools from a [`ContentStore`].
pub struct CandidateSource {
    store: Arc<dyn ContentStore>,
    fetch_mode: FetchMode,
    failure_policy: SourceFailurePolicy,
}

impl CandidateSource {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            fetch_mode: FetchMode::default(),
            failure_policy: SourceFailurePolicy::default(),
        }
    }

    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    pub fn with_failure_policy(mut self, policy: SourceFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Fetch all four pools for an effective `limit`.
    ///
    /// Under [`SourceFailurePolicy::Fail`] the first failing fetch fails the
    /// whole call; under `Degrade` a failing pool comes back empty.
    pub async fn fetch(
        &self,
        company_id: Option<&str>,
        category_id: Option<&str>,
        limit: usize,
    ) -> Result<CandidatePools> {
        let fetch = move |pool: PoolKind| {
            self.fetch_pool(pool, pool_query(pool, company_id, category_id, limit))
        };

        let (organic_articles, sponsored_articles, organic_reviews, sponsored_reviews) =
            match self.fetch_mode {
                FetchMode::Concurrent => futures::try_join!(
                    fetch(PoolKind::OrganicArticles),
                    fetch(PoolKind::SponsoredArticles),
                    fetch(PoolKind::OrganicReviews),
                    fetch(PoolKind::SponsoredReviews),
                )?,
                FetchMode::Sequential => (
                    fetch(PoolKind::OrganicArticles).await?,
                    fetch(PoolKind::SponsoredArticles).await?,
                    fetch(PoolKind::OrganicReviews).await?,
                    fetch(PoolKind::SponsoredReviews).await?,
                ),
            };

        Ok(CandidatePools {
            organic_articles,
            sponsored_articles,
            organic_reviews,
            sponsored_reviews,
        })
    }

    async fn fetch_pool(&self, pool: PoolKind, query: ItemQuery) -> Result<Vec<ContentItem>> {
        match self.store.list_items(&query).await {
            Ok(items) => {
                debug!(
                    pool = %pool,
                    limit = query.limit,
                    found = items.len(),
                    "Fetched candidate pool"
                );
                Ok(items)
            }
            Err(source) => match self.failure_policy {
                SourceFailurePolicy::Fail => Err(Error::SourceFetch { pool, source }),
                SourceFailurePolicy::Degrade => {
                    warn!(
                        pool = %pool,
                        store = self.store.name(),
                        error = %source,
                        "Candidate fetch failed, continuing without this pool"
                    );
                    Ok(Vec::new())
                }
            },
        }
    }
}
