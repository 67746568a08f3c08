//! Feed assembly — sponsored interleaving and the hard size limit.
//!
//! Given the organic stream `O`, the sponsored stream `S`, a limit `L` and an
//! interval `k`:
//!
//! 1. `S` empty: the feed is `O` truncated to `L`.
//! 2. Walk all of `O`. After the `i`-th organic item (1-based), if `i % k == 0`
//!    and `S` has items left, append the next sponsored item. The walk does not
//!    stop at `L`.
//! 3. While `S` has items left and the feed is shorter than `L`, append them.
//! 4. Truncate to `L`.
//!
//! # Determinism
//!
//! Assembly is a pure function of its inputs. Both streams keep their
//! relative order in the output.

use feedmix_core::{ContentItem, FeedRequest};

/// Interleaves a sponsored stream into an organic one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedAssembler {
    limit: usize,
    interval: usize,
}

impl FeedAssembler {
    /// `limit` and `interval` must already be normalized; zero is lifted to one.
    pub fn new(limit: usize, interval: usize) -> Self {
        Self {
            limit: limit.max(1),
            interval: interval.max(1),
        }
    }

    /// Assembler for a request's effective limit and interval.
    pub fn for_request(request: &FeedRequest) -> Self {
        Self::new(
            request.effective_limit(),
            request.effective_sponsored_interval(),
        )
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn assemble(
        &self,
        organic: Vec<ContentItem>,
        sponsored: Vec<ContentItem>,
    ) -> Vec<ContentItem> {
        if sponsored.is_empty() {
            let mut feed = organic;
            feed.truncate(self.limit);
            return feed;
        }

        let mut feed = Vec::with_capacity(organic.len() + sponsored.len());
        let mut sponsored = sponsored.into_iter();

        for (i, item) in organic.into_iter().enumerate() {
            feed.push(item);
            if (i + 1) % self.interval == 0 {
                if let Some(ad) = sponsored.next() {
                    feed.push(ad);
                }
            }
        }

        while feed.len() < self.limit {
            match sponsored.next() {
                Some(ad) => feed.push(ad),
                None => break,
            }
        }

        feed.truncate(self.limit);
        feed
    }
}
