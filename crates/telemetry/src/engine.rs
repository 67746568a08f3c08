//! Thread-safe metrics engine — keeps recent feed records and running
//! totals, and serves snapshots to the gateway and CLI.

use chrono::{DateTime, Utc};
use feedmix_core::{FeedMetrics, MetricsError, MetricsReporter};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{PoisonError, RwLock};

/// Default number of records kept in memory.
pub const DEFAULT_MAX_RECORDS: usize = 1_000;

/// The in-process aggregation sink.
///
/// Thread-safe via `RwLock`. Records are kept in arrival order; once
/// `max_records` is reached the oldest are dropped. Totals cover every
/// record ever reported, pruned or not.
pub struct MetricsEngine {
    max_records: usize,
    /// Most recent last.
    records: RwLock<VecDeque<FeedMetrics>>,
    totals: RwLock<RunningTotals>,
}

#[derive(Debug, Default)]
struct RunningTotals {
    feeds_served: u64,
    items_served: u64,
    sponsored_served: u64,
    empty_feeds: u64,
    total_duration_ms: u64,
    max_duration_ms: u64,
    last_recorded_at: Option<DateTime<Utc>>,
}

/// Aggregate view over every feed reported so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub feeds_served: u64,
    pub items_served: u64,
    pub sponsored_served: u64,
    pub empty_feeds: u64,
    pub avg_duration_ms: f64,
    pub max_duration_ms: u64,
    /// Sponsored share of all items served.
    pub sponsored_ratio: f64,
    pub records_retained: usize,
    pub last_recorded_at: Option<DateTime<Utc>>,
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RECORDS)
    }

    /// Keep at most `max_records` records (at least one).
    pub fn with_capacity(max_records: usize) -> Self {
        let max_records = max_records.max(1);
        Self {
            max_records,
            records: RwLock::new(VecDeque::with_capacity(max_records.min(DEFAULT_MAX_RECORDS))),
            totals: RwLock::new(RunningTotals::default()),
        }
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    /// Add one record and update the running totals.
    pub fn record(&self, metrics: &FeedMetrics) -> Result<(), MetricsError> {
        {
            let mut totals = self.totals.write().map_err(|_| poisoned())?;
            totals.feeds_served += 1;
            totals.items_served += metrics.total_items as u64;
            totals.sponsored_served += metrics.sponsored_included as u64;
            if metrics.total_items == 0 {
                totals.empty_feeds += 1;
            }
            totals.total_duration_ms += metrics.duration_ms;
            totals.max_duration_ms = totals.max_duration_ms.max(metrics.duration_ms);
            totals.last_recorded_at = Some(metrics.recorded_at);
        }

        let mut records = self.records.write().map_err(|_| poisoned())?;
        while records.len() >= self.max_records {
            records.pop_front();
        }
        records.push_back(metrics.clone());
        Ok(())
    }

    /// Up to `limit` records, most recent first.
    pub fn recent(&self, limit: usize) -> Vec<FeedMetrics> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.iter().rev().take(limit).cloned().collect()
    }

    /// Number of records currently retained.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let totals = self.totals.read().unwrap_or_else(PoisonError::into_inner);

        let avg_duration_ms = if totals.feeds_served == 0 {
            0.0
        } else {
            totals.total_duration_ms as f64 / totals.feeds_served as f64
        };
        let sponsored_ratio = if totals.items_served == 0 {
            0.0
        } else {
            totals.sponsored_served as f64 / totals.items_served as f64
        };

        MetricsSnapshot {
            feeds_served: totals.feeds_served,
            items_served: totals.items_served,
            sponsored_served: totals.sponsored_served,
            empty_feeds: totals.empty_feeds,
            avg_duration_ms,
            max_duration_ms: totals.max_duration_ms,
            sponsored_ratio,
            records_retained: self.record_count(),
            last_recorded_at: totals.last_recorded_at,
        }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for MetricsEngine {
    fn name(&self) -> &str {
        "engine"
    }

    fn report(&self, metrics: &FeedMetrics) -> Result<(), MetricsError> {
        self.record(metrics)
    }
}

fn poisoned() -> MetricsError {
    MetricsError::Sink("metrics engine lock poisoned".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(total: usize, sponsored: usize, duration_ms: u64) -> FeedMetrics {
        let mut m = FeedMetrics::new(duration_ms);
        m.total_items = total;
        m.sponsored_included = sponsored;
        m
    }

    #[test]
    fn record_updates_totals() {
        let engine = MetricsEngine::new();
        engine.record(&feed(10, 2, 12)).unwrap();
        engine.record(&feed(0, 0, 4)).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.feeds_served, 2);
        assert_eq!(snapshot.items_served, 10);
        assert_eq!(snapshot.sponsored_served, 2);
        assert_eq!(snapshot.empty_feeds, 1);
        assert_eq!(snapshot.max_duration_ms, 12);
        assert!((snapshot.avg_duration_ms - 8.0).abs() < 1e-10);
        assert!((snapshot.sponsored_ratio - 0.2).abs() < 1e-10);
        assert!(snapshot.last_recorded_at.is_some());
    }

    #[test]
    fn empty_snapshot_has_zero_ratios() {
        let snapshot = MetricsEngine::default().snapshot();
        assert_eq!(snapshot.feeds_served, 0);
        assert_eq!(snapshot.avg_duration_ms, 0.0);
        assert_eq!(snapshot.sponsored_ratio, 0.0);
        assert_eq!(snapshot.last_recorded_at, None);
    }

    #[test]
    fn recent_is_newest_first() {
        let engine = MetricsEngine::new();
        for i in 0..5 {
            engine.record(&feed(i, 0, 1)).unwrap();
        }

        let recent = engine.recent(3);
        let totals: Vec<usize> = recent.iter().map(|m| m.total_items).collect();
        assert_eq!(totals, vec![4, 3, 2]);
    }

    #[test]
    fn oldest_records_pruned_at_capacity() {
        let engine = MetricsEngine::with_capacity(3);
        for i in 0..5 {
            engine.record(&feed(i, 0, 1)).unwrap();
        }

        assert_eq!(engine.record_count(), 3);
        let totals: Vec<usize> = engine.recent(10).iter().map(|m| m.total_items).collect();
        assert_eq!(totals, vec![4, 3, 2]);
        // Totals still count pruned records.
        assert_eq!(engine.snapshot().feeds_served, 5);
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let engine = MetricsEngine::with_capacity(0);
        engine.record(&feed(1, 0, 1)).unwrap();
        engine.record(&feed(2, 0, 1)).unwrap();
        assert_eq!(engine.max_records(), 1);
        assert_eq!(engine.recent(5)[0].total_items, 2);
    }

    #[test]
    fn reports_through_trait() {
        let engine = MetricsEngine::new();
        let reporter: &dyn MetricsReporter = &engine;
        reporter.report(&feed(7, 1, 2)).unwrap();
        assert_eq!(reporter.name(), "engine");
        assert_eq!(engine.snapshot().items_served, 7);
    }
}
