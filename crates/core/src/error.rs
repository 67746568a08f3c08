//! Error types for the feedmix domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] aggregates the
//! ones that can reach a caller of the feed pipeline.

use thiserror::Error;

/// The top-level error type for feed assembly.
#[derive(Debug, Error)]
pub enum Error {
    // --- Candidate fetch errors ---
    #[error("Failed to fetch {pool} candidates: {source}")]
    SourceFetch {
        pool: PoolKind,
        #[source]
        source: StoreError,
    },

    // --- Cancellation ---
    #[error("Feed assembly exceeded its deadline after {after_ms}ms")]
    DeadlineExceeded { after_ms: u64 },

    // --- Store errors outside the pipeline (import) ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// The four candidate pools fetched for every feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    OrganicArticles,
    SponsoredArticles,
    OrganicReviews,
    SponsoredReviews,
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OrganicArticles => write!(f, "organic article"),
            Self::SponsoredArticles => write!(f, "sponsored article"),
            Self::OrganicReviews => write!(f, "organic campaign-review"),
            Self::SponsoredReviews => write!(f, "sponsored campaign-review"),
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Metrics serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metrics sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metrics sink rejected record: {0}")]
    Sink(String),
}
