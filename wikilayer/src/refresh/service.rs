//! Refresh cycle orchestration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::PageCache;
use crate::geo::Position;
use crate::page::{PageKey, PageView, WikipediaPage};
use crate::telemetry::RefreshMetrics;
use crate::wikipedia::{HttpClient, WikipediaClient, DEFAULT_SEARCH_LIMIT};

use super::{RefreshConfig, RefreshPolicy};

/// Runs the refresh cycle for one session.
///
/// Owns the page cache, the debounce policy and the Wikipedia client. A
/// position tick either triggers a search-merge-backfill cycle or is served
/// straight from the warm cache; either way the caller gets the current
/// display view.
///
/// [`process_position`](Self::process_position) awaits the network inline
/// and is the simple composition for callers that already serialize ticks.
/// The session event loop uses the finer-grained steps
/// ([`decide`](Self::decide), [`apply_search_results`](Self::apply_search_results),
/// [`apply_summaries`](Self::apply_summaries), [`view`](Self::view)) to keep
/// cache writes on its own timeline while fetches run as spawned tasks.
pub struct RefreshService<H: HttpClient> {
    client: Arc<WikipediaClient<H>>,
    cache: PageCache,
    policy: RefreshPolicy,
    config: RefreshConfig,
    metrics: Arc<RefreshMetrics>,
}

impl<H: HttpClient> RefreshService<H> {
    /// Creates a service around the given client and configuration.
    pub fn new(client: WikipediaClient<H>, config: RefreshConfig) -> Self {
        let policy = RefreshPolicy::new(config.min_travel_m, config.min_interval);
        Self {
            client: Arc::new(client),
            cache: PageCache::new(),
            policy,
            config,
            metrics: Arc::new(RefreshMetrics::new()),
        }
    }

    /// The shared Wikipedia client.
    pub fn client(&self) -> Arc<WikipediaClient<H>> {
        Arc::clone(&self.client)
    }

    /// The shared metrics counters.
    pub fn metrics(&self) -> Arc<RefreshMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The active configuration.
    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Whether `position` warrants a new geosearch request.
    ///
    /// Records the tick in metrics; a declined tick counts as debounced.
    pub fn decide(&self, position: Position) -> bool {
        self.metrics.record_tick();
        let fetch = self.policy.should_fetch(position);
        if !fetch {
            self.metrics.record_tick_debounced();
        }
        fetch
    }

    /// Merges search results for a request issued from `origin` and returns
    /// the keys of in-range pages still lacking a summary (bounded by the
    /// per-cycle limit), nearest first.
    pub fn apply_search_results(
        &mut self,
        origin: Position,
        pages: Vec<WikipediaPage>,
    ) -> Vec<PageKey> {
        let added = self.cache.add_new_pages_only(pages);
        self.policy.note_fetch(origin);
        self.metrics.record_search();
        self.metrics.record_pages_added(added as u64);
        if added > 0 {
            info!("Cached {} new pages ({} total)", added, self.cache.len());
        } else {
            debug!("Search returned no new pages ({} cached)", self.cache.len());
        }

        self.cache.pages_without_summary(
            &self.config.language,
            origin,
            self.config.search_radius_m,
            self.config.summary_batch_limit,
        )
    }

    /// Records a failed search so the next qualifying tick retries.
    pub fn note_search_failure(&self, error: &crate::wikipedia::WikipediaError) {
        warn!("Geosearch failed, serving cached pages: {}", error);
        self.metrics.record_search_failure();
    }

    /// Applies fetched summaries to the cache by key.
    pub fn apply_summaries(&mut self, summaries: HashMap<i64, String>) {
        let mut applied = 0u64;
        for (page_id, summary) in summaries {
            let key = PageKey::new(page_id, self.config.language.clone());
            self.cache.set_summary(&key, summary);
            applied += 1;
        }
        self.metrics.record_summaries_applied(applied);
        debug!("Applied {} summaries", applied);
    }

    /// The current display view: pages within the display radius of
    /// `position`, ascending by distance.
    pub fn view(&mut self, position: Position) -> Vec<PageView> {
        self.cache
            .get(&self.config.language, position, self.config.display_radius_m)
            .iter()
            .map(PageView::from)
            .collect()
    }

    /// Runs one full refresh cycle inline and returns the display view.
    ///
    /// Network failures degrade to serving the warm cache; they never
    /// propagate out of the cycle.
    pub async fn process_position(&mut self, position: Position) -> Vec<PageView> {
        if self.decide(position) {
            let result = self
                .client
                .search_nearby(
                    &self.config.language,
                    position,
                    self.config.search_radius_m,
                    DEFAULT_SEARCH_LIMIT,
                )
                .await;
            match result {
                Ok(pages) => {
                    let missing = self.apply_search_results(position, pages);
                    self.backfill_summaries(missing).await;
                }
                Err(e) => self.note_search_failure(&e),
            }
        }
        self.view(position)
    }

    /// Fetches and applies summaries for the given keys inline.
    async fn backfill_summaries(&mut self, keys: Vec<PageKey>) {
        if keys.is_empty() {
            return;
        }
        let ids: Vec<i64> = keys.iter().map(|k| k.page_id).collect();
        match self.client.fetch_summaries(&self.config.language, &ids).await {
            Ok(summaries) => self.apply_summaries(summaries),
            Err(e) => {
                warn!("Summary fetch failed: {}", e);
                self.metrics.record_summary_failure();
            }
        }
    }

    /// Clears the debounce state and the cache. Invoked on disconnect so a
    /// later reconnect starts a fresh cycle.
    pub fn reset(&mut self) {
        self.policy.reset();
        self.cache.clear();
        info!("Refresh state reset");
    }

    pub(crate) fn cache_mut(&mut self) -> &mut PageCache {
        &mut self.cache
    }

    pub(crate) fn policy_mut(&mut self) -> &mut RefreshPolicy {
        &mut self.policy
    }
}
