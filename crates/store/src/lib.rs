//! Content store implementations for feedmix.

pub mod in_memory;
pub mod noop;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use noop::NoopStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

use feedmix_config::{StoreBackend, StoreConfig};
use feedmix_core::{ContentStore, StoreError};
use std::sync::Arc;
use tracing::info;

/// Open the backend selected by `config`.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn ContentStore>, StoreError> {
    let store: Arc<dyn ContentStore> = match config.backend {
        StoreBackend::None => Arc::new(NoopStore),
        StoreBackend::InMemory => Arc::new(InMemoryStore::new()),
        #[cfg(feature = "sqlite")]
        StoreBackend::Sqlite => {
            let path = config.resolved_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("Cannot create {}: {e}", parent.display()))
                })?;
            }
            let url = format!("sqlite://{}", path.display());
            Arc::new(SqliteStore::connect(&url, config.max_connections).await?)
        }
        #[cfg(not(feature = "sqlite"))]
        StoreBackend::Sqlite => {
            return Err(StoreError::Unavailable(
                "built without the `sqlite` feature".into(),
            ));
        }
    };

    info!(backend = store.name(), "Content store opened");
    Ok(store)
}
