//! In-memory store — useful for testing and ephemeral demo data.

use async_trait::async_trait;
use feedmix_core::{ContentItem, ContentStore, ItemQuery, StoreError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A store that keeps items in a Vec and filters/sorts on every query.
pub struct InMemoryStore {
    items: Arc<RwLock<Vec<ContentItem>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Build a store pre-populated with `items` (later duplicates win).
    pub fn with_items(items: impl IntoIterator<Item = ContentItem>) -> Self {
        let mut stored: Vec<ContentItem> = Vec::new();
        for item in items {
            upsert(&mut stored, item.normalized());
        }
        Self {
            items: Arc::new(RwLock::new(stored)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn upsert(items: &mut Vec<ContentItem>, item: ContentItem) {
    match items
        .iter_mut()
        .find(|e| e.kind() == item.kind() && e.id() == item.id())
    {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[async_trait]
impl ContentStore for InMemoryStore {
    fn name(&self) -> &str { "in_memory" }

    async fn list_items(&self, query: &ItemQuery) -> Result<Vec<ContentItem>, StoreError> {
        let items = self.items.read().await;

        let mut results: Vec<ContentItem> = items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();

        results.sort_by(ContentItem::newest_first);
        results.truncate(query.limit);

        Ok(results)
    }

    async fn insert(&self, item: ContentItem) -> Result<(), StoreError> {
        upsert(&mut *self.items.write().await, item.normalized());
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.items.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use feedmix_core::{Article, CampaignReview, ContentKind};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn article(id: &str, t: i64) -> Article {
        Article::new(id, format!("Article {id}"), at(t))
    }

    #[tokio::test]
    async fn lists_newest_first_within_limit() {
        let store = InMemoryStore::with_items([
            article("a1", 10).into(),
            article("a2", 30).into(),
            article("a3", 20).into(),
        ]);

        let results = store
            .list_items(&ItemQuery::new(ContentKind::Article, false, 2))
            .await
            .unwrap();
        let ids: Vec<&str> = results.iter().map(|i| i.id()).collect();
        assert_eq!(ids, vec!["a2", "a3"]);
    }

    #[tokio::test]
    async fn separates_kinds_and_sponsorship() {
        let store = InMemoryStore::with_items([
            article("a1", 1).into(),
            article("a2", 2).sponsored(Some("Ad".into())).into(),
            CampaignReview::new("r1", "Review", at(3)).into(),
        ]);

        let sponsored = store
            .list_items(&ItemQuery::new(ContentKind::Article, true, 10))
            .await
            .unwrap();
        assert_eq!(sponsored.len(), 1);
        assert_eq!(sponsored[0].id(), "a2");

        let reviews = store
            .list_items(&ItemQuery::new(ContentKind::CampaignReview, false, 10))
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id(), "r1");
    }

    #[tokio::test]
    async fn filters_by_company_and_category() {
        let store = InMemoryStore::with_items([
            article("a1", 1).with_company("acme").with_category("news").into(),
            article("a2", 2).with_company("acme").with_category("ops").into(),
            article("a3", 3).with_company("globex").with_category("news").into(),
        ]);

        let query = ItemQuery::new(ContentKind::Article, false, 10)
            .company(Some("acme"))
            .category(Some("news"));
        let results = store.list_items(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id(), "a1");
    }

    #[tokio::test]
    async fn insert_replaces_same_kind_and_id() {
        let store = InMemoryStore::new();
        store.insert(article("a1", 1).into()).await.unwrap();
        store
            .insert(Article::new("a1", "Renamed", at(1)).into())
            .await
            .unwrap();
        store
            .insert(CampaignReview::new("a1", "Same id, other kind", at(1)).into())
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 2);
        let articles = store
            .list_items(&ItemQuery::new(ContentKind::Article, false, 10))
            .await
            .unwrap();
        assert_eq!(articles[0].title(), "Renamed");
    }

    #[tokio::test]
    async fn zero_limit_returns_nothing() {
        let store = InMemoryStore::with_items([article("a1", 1).into()]);
        let results = store
            .list_items(&ItemQuery::new(ContentKind::Article, false, 0))
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
