//! # feedmix core
//!
//! Domain types, traits, and error definitions for the feedmix content-feed
//! engine. This crate has **no framework dependencies**: it defines the
//! model that the store, engine, telemetry and gateway crates implement
//! against.
//!
//! ## Seams
//!
//! Every collaborator of the feed engine is a trait here:
//! - [`ContentStore`] answers "list items of kind K, sponsored or not,
//!   matching these filters, newest first, at most N"
//! - [`MetricsReporter`] receives one [`FeedMetrics`] record per assembled feed
//!
//! Implementations live in their own crates and are swapped via configuration.

pub mod content;
pub mod error;
pub mod metrics;
pub mod request;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use content::{Article, CampaignReview, ContentItem, ContentKind};
pub use error::{Error, MetricsError, PoolKind, Result, StoreError};
pub use metrics::{FeedMetrics, MetricsReporter};
pub use request::{
    DEFAULT_SPONSORED_INTERVAL, FeedRequest, FeedResult, MAX_FEED_LIMIT, MIN_FEED_LIMIT,
};
pub use store::{ContentStore, ItemQuery};
