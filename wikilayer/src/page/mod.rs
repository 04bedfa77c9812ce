//! Wikipedia page entities.
//!
//! A [`WikipediaPage`] identifies an article by `(page id, language code)`
//! and carries its coordinate, a lazily fetched summary, and the distance to
//! the most recent reference position. [`PageView`] is the flattened record
//! handed to display consumers.

use crate::geo::Position;

/// Cache identity of a Wikipedia article.
///
/// The same page id can exist on several language wikis, so the language
/// code is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageKey {
    /// Upstream page id.
    pub page_id: i64,
    /// Wikipedia language code (e.g. "en", "de").
    pub language: String,
}

impl PageKey {
    /// Creates a page key.
    pub fn new(page_id: i64, language: impl Into<String>) -> Self {
        Self {
            page_id,
            language: language.into(),
        }
    }
}

/// A Wikipedia article near some position.
///
/// Created from a geosearch result with no summary; the summary is filled in
/// by a later extracts fetch. `distance_m` is a derived value, recomputed
/// every time the cache is queried against a new reference position.
#[derive(Debug, Clone)]
pub struct WikipediaPage {
    /// Upstream page id.
    pub page_id: i64,
    /// Wikipedia language code.
    pub language: String,
    /// Article title.
    pub title: String,
    /// Article coordinate.
    pub position: Position,
    /// Intro extract; `None` until fetched. An extract the API never
    /// returned stays `None`, it is not an empty string.
    pub summary: Option<String>,
    /// Distance in meters to the last reference position the cache was
    /// queried with.
    pub distance_m: f64,
}

impl WikipediaPage {
    /// Creates a page from a geosearch result (no summary yet).
    pub fn new(
        page_id: i64,
        language: impl Into<String>,
        title: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            page_id,
            language: language.into(),
            title: title.into(),
            position,
            summary: None,
            distance_m: 0.0,
        }
    }

    /// The page's cache key.
    pub fn key(&self) -> PageKey {
        PageKey::new(self.page_id, self.language.clone())
    }

    /// Canonical article URL, derived from language and title.
    pub fn url(&self) -> String {
        format!(
            "https://{}.wikipedia.org/wiki/{}",
            self.language,
            self.title.replace(' ', "_")
        )
    }
}

/// Display record produced for UI consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// Article title.
    pub title: String,
    /// Canonical article URL.
    pub url: String,
    /// Distance in meters from the current reference position.
    pub distance_m: f64,
    /// Intro extract, if already fetched.
    pub summary: Option<String>,
}

impl From<&WikipediaPage> for PageView {
    fn from(page: &WikipediaPage) -> Self {
        Self {
            title: page.title.clone(),
            url: page.url(),
            distance_m: page.distance_m,
            summary: page.summary.clone(),
        }
    }
}
