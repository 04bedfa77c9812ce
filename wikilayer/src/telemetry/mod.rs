//! Refresh-cycle telemetry for observability and user feedback.
//!
//! Lock-free atomic counters recorded by the refresh pipeline, with a
//! point-in-time [`MetricsSnapshot`] for display layers.
//!
//! ```text
//! Session / RefreshService ─────► RefreshMetrics ─────► MetricsSnapshot
//!                                 (atomic counters)     (point-in-time copy)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters recorded across a session's refresh cycles.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
    ticks: AtomicU64,
    ticks_debounced: AtomicU64,
    searches: AtomicU64,
    search_failures: AtomicU64,
    pages_added: AtomicU64,
    summaries_applied: AtomicU64,
    summary_failures: AtomicU64,
}

impl RefreshMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// A position tick arrived.
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    /// A tick was served from the warm cache without a fetch.
    pub fn record_tick_debounced(&self) {
        self.ticks_debounced.fetch_add(1, Ordering::Relaxed);
    }

    /// A geosearch request completed successfully.
    pub fn record_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// A geosearch request failed.
    pub fn record_search_failure(&self) {
        self.search_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// `count` new pages were merged into the cache.
    pub fn record_pages_added(&self, count: u64) {
        self.pages_added.fetch_add(count, Ordering::Relaxed);
    }

    /// `count` summaries were applied to cached pages.
    pub fn record_summaries_applied(&self, count: u64) {
        self.summaries_applied.fetch_add(count, Ordering::Relaxed);
    }

    /// A summary fetch failed.
    pub fn record_summary_failure(&self) {
        self.summary_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            ticks_debounced: self.ticks_debounced.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            search_failures: self.search_failures.load(Ordering::Relaxed),
            pages_added: self.pages_added.load(Ordering::Relaxed),
            summaries_applied: self.summaries_applied.load(Ordering::Relaxed),
            summary_failures: self.summary_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`RefreshMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Position ticks received.
    pub ticks: u64,
    /// Ticks served from cache without a fetch.
    pub ticks_debounced: u64,
    /// Successful geosearch requests.
    pub searches: u64,
    /// Failed geosearch requests.
    pub search_failures: u64,
    /// Pages merged into the cache.
    pub pages_added: u64,
    /// Summaries applied to cached pages.
    pub summaries_applied: u64,
    /// Failed summary fetches.
    pub summary_failures: u64,
}
