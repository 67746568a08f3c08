//! No-op store — holds nothing, every feed comes back empty.

use async_trait::async_trait;
use feedmix_core::{ContentItem, ContentStore, ItemQuery, StoreError};

/// A store that discards writes and answers every query with no items.
pub struct NoopStore;

#[async_trait]
impl ContentStore for NoopStore {
    fn name(&self) -> &str { "none" }

    async fn list_items(&self, _query: &ItemQuery) -> Result<Vec<ContentItem>, StoreError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _item: ContentItem) -> Result<(), StoreError> {
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(0)
    }
}
