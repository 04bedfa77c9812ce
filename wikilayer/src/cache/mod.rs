//! In-memory page cache.
//!
//! Stores every page the geosearch has ever returned for the session, keyed
//! by `(page id, language)`, and serves radius-filtered, distance-sorted
//! views against an arbitrary reference position. The wide search radius
//! fills this cache infrequently; filtering it is cheap and runs on every
//! position tick.
//!
//! The cache is a plain single-owner structure. All reads and writes happen
//! on the session timeline, so no internal locking is needed.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::geo::Position;
use crate::page::{PageKey, WikipediaPage};

/// Session-scoped store of pages returned by geosearch.
///
/// Invariant: never holds two entries with the same `(page id, language)`.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: HashMap<PageKey, WikipediaPage>,
}

impl PageCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts only those candidates whose key is not already present.
    ///
    /// Returns the number of pages actually inserted. Duplicates keep the
    /// already-cached entry (and its fetched summary) untouched.
    pub fn add_new_pages_only(&mut self, candidates: Vec<WikipediaPage>) -> usize {
        let mut added = 0;
        for page in candidates {
            if let std::collections::hash_map::Entry::Vacant(entry) = self.pages.entry(page.key())
            {
                entry.insert(page);
                added += 1;
            }
        }
        added
    }

    /// Pages matching `language` within `radius_m` of `reference`, ascending
    /// by distance.
    ///
    /// As a side effect, recomputes and stores each matching page's
    /// `distance_m` against `reference`. Ties sort stably.
    pub fn get(&mut self, language: &str, reference: Position, radius_m: u32) -> Vec<WikipediaPage> {
        let mut nearby: Vec<WikipediaPage> = Vec::new();
        for page in self.pages.values_mut() {
            if page.language != language {
                continue;
            }
            let distance = reference.distance_m(page.position);
            if distance <= radius_m as f64 {
                page.distance_m = distance;
                nearby.push(page.clone());
            }
        }
        nearby.sort_by(|a, b| {
            a.distance_m
                .partial_cmp(&b.distance_m)
                .unwrap_or(Ordering::Equal)
        });
        nearby
    }

    /// Keys of up to `limit` pages in range that still lack a summary.
    ///
    /// Same filter and ordering as [`get`](Self::get); nearest pages come
    /// first so they get their summaries first.
    pub fn pages_without_summary(
        &mut self,
        language: &str,
        reference: Position,
        radius_m: u32,
        limit: usize,
    ) -> Vec<PageKey> {
        self.get(language, reference, radius_m)
            .iter()
            .filter(|p| p.summary.is_none())
            .take(limit)
            .map(|p| p.key())
            .collect()
    }

    /// Records a fetched summary for `key`.
    ///
    /// A no-op for unknown keys; the page may have been cleaned up while
    /// the fetch was in flight.
    pub fn set_summary(&mut self, key: &PageKey, summary: String) {
        if let Some(page) = self.pages.get_mut(key) {
            page.summary = Some(summary);
        }
    }

    /// Removes all cached pages within `radius_m` of `reference`, across
    /// languages. Returns the number of pages removed.
    pub fn clean_up(&mut self, reference: Position, radius_m: u32) -> usize {
        let before = self.pages.len();
        self.pages
            .retain(|_, page| reference.distance_m(page.position) > radius_m as f64);
        before - self.pages.len()
    }

    /// Removes all pages.
    pub fn clear(&mut self) {
        self.pages.clear();
    }

    /// Number of cached pages across all languages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the cache holds no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
