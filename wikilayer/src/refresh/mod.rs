//! Refresh policy and service.
//!
//! Decides, for each incoming position, whether a new geosearch request is
//! worth issuing, and runs the full refresh cycle: search, cache merge,
//! summary backfill, display view.
//!
//! # Debounce
//!
//! The geosearch call is the expensive, rate-limited operation; filtering
//! the warm cache is cheap and runs on every tick. A new request is issued
//! only when the aircraft has traveled far enough from the origin of the
//! last request AND enough wall-clock time has passed:
//!
//! ```text
//!                first position
//!       Idle ──────────────────────► Tracking { origin, fetched_at }
//!        ^                              │   fetch iff
//!        │          reset()             │   distance(current, origin) > min_travel
//!        +──────────────────────────────+   && elapsed >= min_interval
//! ```
//!
//! The search radius (how wide a net is cast, amortized across movement) is
//! deliberately decoupled from the display radius (what is currently shown).

mod policy;
mod service;

pub use policy::RefreshPolicy;
pub use service::RefreshService;

use std::time::Duration;

use crate::wikipedia::GEOSEARCH_MAX_RADIUS_M;

/// Default Wikipedia language code.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default search radius in meters (the geosearch API ceiling).
pub const DEFAULT_SEARCH_RADIUS_M: u32 = GEOSEARCH_MAX_RADIUS_M;

/// Default display radius in meters.
pub const DEFAULT_DISPLAY_RADIUS_M: u32 = 3_000;

/// Default minimum travel distance before a new search, in meters.
pub const DEFAULT_MIN_TRAVEL_M: f64 = 1_000.0;

/// Default minimum wall-clock interval between searches.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(3);

/// Default maximum number of summaries backfilled per refresh cycle.
pub const DEFAULT_SUMMARY_BATCH_LIMIT: usize = 50;

/// Configuration for the refresh pipeline.
#[derive(Clone, Debug)]
pub struct RefreshConfig {
    /// Wikipedia language code.
    pub language: String,

    /// Radius for geosearch requests, in meters. Clamped to the API
    /// maximum of [`GEOSEARCH_MAX_RADIUS_M`].
    pub search_radius_m: u32,

    /// Radius for the served display view, in meters. Typically smaller
    /// than the search radius.
    pub display_radius_m: u32,

    /// Minimum travel distance from the last request origin before a new
    /// search is issued, in meters.
    pub min_travel_m: f64,

    /// Minimum wall-clock time between searches.
    pub min_interval: Duration,

    /// Maximum number of summaries backfilled per cycle.
    pub summary_batch_limit: usize,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            search_radius_m: DEFAULT_SEARCH_RADIUS_M,
            display_radius_m: DEFAULT_DISPLAY_RADIUS_M,
            min_travel_m: DEFAULT_MIN_TRAVEL_M,
            min_interval: DEFAULT_MIN_INTERVAL,
            summary_batch_limit: DEFAULT_SUMMARY_BATCH_LIMIT,
        }
    }
}

impl RefreshConfig {
    /// Creates a config with defaults for the given language.
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Set the search radius (clamped to the API maximum).
    pub fn with_search_radius_m(mut self, radius_m: u32) -> Self {
        self.search_radius_m = radius_m.min(GEOSEARCH_MAX_RADIUS_M);
        self
    }

    /// Set the display radius.
    pub fn with_display_radius_m(mut self, radius_m: u32) -> Self {
        self.display_radius_m = radius_m;
        self
    }

    /// Set the debounce travel distance.
    pub fn with_min_travel_m(mut self, meters: f64) -> Self {
        self.min_travel_m = meters;
        self
    }

    /// Set the debounce interval.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set the per-cycle summary backfill limit.
    pub fn with_summary_batch_limit(mut self, limit: usize) -> Self {
        self.summary_batch_limit = limit;
        self
    }
}
