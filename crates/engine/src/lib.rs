//! Feed assembly for feedmix.
//!
//! The pipeline, leaves first:
//!
//! 1. [`CandidateSource`] — four bounded, recency-ordered pools from the store
//! 2. [`PoolMerger`] — one organic stream, one sponsored stream
//! 3. [`FeedAssembler`] — interleaves sponsored items into the organic stream
//!    and bounds the result
//! 4. [`FeedPipeline`] — runs 1-3 under an optional deadline, then hands a
//!    [`FeedMetrics`](feedmix_core::FeedMetrics) record to the reporter
//!
//! Steps 2 and 3 are pure functions of their inputs.

pub mod assembler;
pub mod candidates;
pub mod merge;
pub mod pipeline;

pub use assembler::FeedAssembler;
pub use candidates::{CandidatePools, CandidateSource};
pub use merge::{MergedStreams, PoolMerger};
pub use pipeline::{FeedPipeline, PipelineOptions};
