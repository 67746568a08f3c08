//! `feedmix import` — Load content items into the store.
//!
//! The file holds a JSON array of items in the same shape the feed returns:
//!
//! ```json
//! [{ "type": "article", "id": "42", "title": "...", "company_id": "acme",
//!    "category_id": "news", "created_at": "2024-05-01T12:00:00Z",
//!    "sponsored": false }]
//! ```

use feedmix_core::{ContentItem, ContentStore};
use std::path::Path;
use tracing::info;

pub async fn run(path: Option<&Path>, file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(path)?;
    let items = read_items(file)?;

    let store = feedmix_store::open_store(&config.store).await?;
    let imported = import_items(store.as_ref(), items).await?;

    println!(
        "Imported {imported} items into the {} store ({} total)",
        store.name(),
        store.count().await?
    );
    Ok(())
}

pub fn read_items(file: &Path) -> Result<Vec<ContentItem>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    let items: Vec<ContentItem> = serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid content file {}: {e}", file.display()))?;
    Ok(items)
}

/// Upsert every item; returns how many were written.
pub async fn import_items(
    store: &dyn ContentStore,
    items: Vec<ContentItem>,
) -> feedmix_core::Result<usize> {
    let total = items.len();
    for item in items {
        store.insert(item).await?;
    }
    info!(store = store.name(), items = total, "Import complete");
    Ok(total)
}
