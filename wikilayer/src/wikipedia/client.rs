//! Wikipedia geosearch and extracts client.
//!
//! Stateless request/response wrapper around the two action-API queries the
//! refresh pipeline consumes. Radius clamping, coordinate formatting, id
//! batching and the extracts continuation loop all live here; caching and
//! refresh policy do not.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::geo::Position;
use crate::page::WikipediaPage;

use super::http::HttpClient;
use super::types::{Continuation, ExtractsResponse, GeosearchResponse, WikipediaError};

/// Maximum radius accepted by the geosearch endpoint, in meters.
///
/// Larger requested radii are clamped client-side rather than rejected.
pub const GEOSEARCH_MAX_RADIUS_M: u32 = 10_000;

/// Maximum number of page ids per extracts request.
pub const SUMMARY_BATCH_SIZE: usize = 50;

/// Default result limit for a geosearch query.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Client for the Wikipedia action API.
///
/// Generic over [`HttpClient`] so tests can script responses without a
/// network. The client holds no state between calls.
pub struct WikipediaClient<H: HttpClient> {
    http: H,
}

impl<H: HttpClient> WikipediaClient<H> {
    /// Creates a client on top of the given HTTP client.
    pub fn new(http: H) -> Self {
        Self { http }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &H {
        &self.http
    }

    /// Searches for pages within `radius_m` meters of `position`.
    ///
    /// Returns up to `limit` pages in upstream order (not guaranteed to be
    /// distance-sorted), each with no summary yet. The radius is clamped to
    /// [`GEOSEARCH_MAX_RADIUS_M`].
    pub async fn search_nearby(
        &self,
        language: &str,
        position: Position,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<WikipediaPage>, WikipediaError> {
        let url = format!(
            "https://{}.wikipedia.org/w/api.php?action=query&format=json&list=geosearch&gscoord={:.4}|{:.4}&gsradius={}&gslimit={}",
            language,
            position.latitude(),
            position.longitude(),
            radius_m.min(GEOSEARCH_MAX_RADIUS_M),
            limit,
        );
        debug!("GET {}", url);

        let body = self.http.get(&url).await?;
        let parsed: GeosearchResponse = serde_json::from_slice(&body)?;

        let mut pages = Vec::with_capacity(parsed.query.geosearch.len());
        for hit in parsed.query.geosearch {
            match Position::new(hit.lat, hit.lon) {
                Ok(position) => {
                    pages.push(WikipediaPage::new(hit.pageid, language, hit.title, position))
                }
                Err(e) => {
                    warn!("Skipping page {} ({}): {}", hit.pageid, hit.title, e);
                }
            }
        }
        Ok(pages)
    }

    /// Fetches intro extracts for the given page ids.
    ///
    /// Ids are batched in groups of [`SUMMARY_BATCH_SIZE`]; within a batch
    /// the request is repeated with the `excontinue`/`continue` parameters
    /// from the previous response until the response omits the continuation
    /// marker. Pages the API returned no extract for are absent from the
    /// result map. An empty id list returns immediately without a request.
    pub async fn fetch_summaries(
        &self,
        language: &str,
        page_ids: &[i64],
    ) -> Result<HashMap<i64, String>, WikipediaError> {
        let mut summaries = HashMap::new();
        if page_ids.is_empty() {
            return Ok(summaries);
        }

        for batch in page_ids.chunks(SUMMARY_BATCH_SIZE) {
            let ids = batch
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("|");

            let mut continuation: Option<Continuation> = None;
            loop {
                let mut url = format!(
                    "https://{}.wikipedia.org/w/api.php?format=json&action=query&prop=extracts&exintro&explaintext&pageids={}",
                    language, ids,
                );
                if let Some(c) = &continuation {
                    url.push_str(&format!("&excontinue={}&continue={}", c.excontinue, c.token));
                }
                debug!("GET {}", url);

                let body = self.http.get(&url).await?;
                let parsed: ExtractsResponse = serde_json::from_slice(&body)?;

                for page in parsed.query.pages.values() {
                    if let Some(extract) = &page.extract {
                        summaries.insert(page.pageid, extract.trim().to_string());
                    }
                }

                match parsed.continuation {
                    Some(c) => continuation = Some(c),
                    None => break,
                }
            }
        }
        Ok(summaries)
    }

    /// Fetches the intro extract for a single page.
    ///
    /// Returns `Ok(None)` when the API has no extract for the page.
    pub async fn fetch_summary(
        &self,
        page: &WikipediaPage,
    ) -> Result<Option<String>, WikipediaError> {
        let summaries = self.fetch_summaries(&page.language, &[page.page_id]).await?;
        Ok(summaries.get(&page.page_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikipedia::http::tests::MockHttpClient;

    fn pos(lat: f64, lon: f64) -> Position {
        Position::new(lat, lon).unwrap()
    }

    fn geosearch_body(hits: &[(i64, &str, f64, f64)]) -> String {
        let entries = hits
            .iter()
            .map(|(id, title, lat, lon)| {
                format!(
                    r#"{{ "pageid": {}, "ns": 0, "title": "{}", "lat": {}, "lon": {}, "dist": 0, "primary": "" }}"#,
                    id, title, lat, lon
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(r#"{{ "query": {{ "geosearch": [{}] }} }}"#, entries)
    }

    fn extracts_body(pages: &[(i64, Option<&str>)], continuation: Option<(i64, &str)>) -> String {
        let entries = pages
            .iter()
            .map(|(id, extract)| match extract {
                Some(text) => format!(
                    r#""{}": {{ "pageid": {}, "title": "P{}", "extract": "{}" }}"#,
                    id, id, id, text
                ),
                None => format!(r#""{}": {{ "pageid": {}, "title": "P{}" }}"#, id, id, id),
            })
            .collect::<Vec<_>>()
            .join(",");
        match continuation {
            Some((excontinue, token)) => format!(
                r#"{{ "continue": {{ "excontinue": {}, "continue": "{}" }}, "query": {{ "pages": {{ {} }} }} }}"#,
                excontinue, token, entries
            ),
            None => format!(r#"{{ "query": {{ "pages": {{ {} }} }} }}"#, entries),
        }
    }

    #[tokio::test]
    async fn test_search_nearby_maps_hits_to_pages() {
        let mock = MockHttpClient::new();
        mock.push_json(&geosearch_body(&[
            (5764, "Greifswald", 54.0964, 13.3878),
            (910, "Eldena Abbey", 54.0933, 13.4481),
        ]));
        let client = WikipediaClient::new(mock);

        let pages = client
            .search_nearby("en", pos(54.0960, 13.3880), 5000, 50)
            .await
            .unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_id, 5764);
        assert_eq!(pages[0].title, "Greifswald");
        assert_eq!(pages[0].language, "en");
        assert!(pages[0].summary.is_none());
        // Upstream order is preserved.
        assert_eq!(pages[1].title, "Eldena Abbey");
    }

    #[tokio::test]
    async fn test_search_nearby_builds_expected_url() {
        let mock = MockHttpClient::new();
        mock.push_json(&geosearch_body(&[]));
        let client = WikipediaClient::new(mock);

        client
            .search_nearby("de", pos(54.153131, -13.778811), 3000, 50)
            .await
            .unwrap();

        let requests = client.http.requests();
        assert_eq!(
            requests[0],
            "https://de.wikipedia.org/w/api.php?action=query&format=json&list=geosearch&gscoord=54.1531|-13.7788&gsradius=3000&gslimit=50"
        );
    }

    #[tokio::test]
    async fn test_search_nearby_clamps_radius_to_api_maximum() {
        let mock = MockHttpClient::new();
        mock.push_json(&geosearch_body(&[]));
        let client = WikipediaClient::new(mock);

        client
            .search_nearby("en", pos(0.0, 0.0), 50_000, 50)
            .await
            .unwrap();

        assert!(client.http.requests()[0].contains("gsradius=10000"));
    }

    #[tokio::test]
    async fn test_search_nearby_propagates_http_error() {
        let mock = MockHttpClient::new();
        mock.push_error("connection refused");
        let client = WikipediaClient::new(mock);

        let result = client.search_nearby("en", pos(0.0, 0.0), 5000, 50).await;
        assert!(matches!(result, Err(WikipediaError::Http(_))));
    }

    #[tokio::test]
    async fn test_search_nearby_rejects_malformed_body() {
        let mock = MockHttpClient::new();
        mock.push_json(r#"{ "error": "bad request" }"#);
        let client = WikipediaClient::new(mock);

        let result = client.search_nearby("en", pos(0.0, 0.0), 5000, 50).await;
        assert!(matches!(result, Err(WikipediaError::Deserialization(_))));
    }

    #[tokio::test]
    async fn test_fetch_summaries_empty_input_issues_no_request() {
        let mock = MockHttpClient::new();
        let client = WikipediaClient::new(mock);

        let summaries = client.fetch_summaries("en", &[]).await.unwrap();
        assert!(summaries.is_empty());
        assert_eq!(client.http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_summaries_batches_in_groups_of_fifty() {
        let mock = MockHttpClient::new();
        let ids: Vec<i64> = (1..=120).collect();
        // Three batches (50 + 50 + 20), none with continuation.
        mock.push_json(&extracts_body(&[(1, Some("a"))], None));
        mock.push_json(&extracts_body(&[(51, Some("b"))], None));
        mock.push_json(&extracts_body(&[(101, Some("c"))], None));
        let client = WikipediaClient::new(mock);

        let summaries = client.fetch_summaries("en", &ids).await.unwrap();

        assert_eq!(client.http.request_count(), 3);
        assert_eq!(summaries.len(), 3);

        let requests = client.http.requests();
        assert!(requests[0].contains("pageids=1|"));
        assert!(requests[0].contains("|50"));
        assert!(requests[1].contains("pageids=51|"));
        assert!(requests[2].contains("pageids=101|"));
    }

    #[tokio::test]
    async fn test_fetch_summaries_follows_continuation_until_absent() {
        let mock = MockHttpClient::new();
        mock.push_json(&extracts_body(&[(1, Some("first"))], Some((2, "||"))));
        mock.push_json(&extracts_body(&[(2, Some("second"))], Some((3, "||"))));
        mock.push_json(&extracts_body(&[(3, Some("third"))], None));
        let client = WikipediaClient::new(mock);

        let summaries = client.fetch_summaries("en", &[1, 2, 3]).await.unwrap();

        assert_eq!(client.http.request_count(), 3);
        assert_eq!(summaries[&1], "first");
        assert_eq!(summaries[&2], "second");
        assert_eq!(summaries[&3], "third");

        let requests = client.http.requests();
        assert!(!requests[0].contains("excontinue"));
        assert!(requests[1].contains("&excontinue=2&continue=||"));
        assert!(requests[2].contains("&excontinue=3&continue=||"));
    }

    #[tokio::test]
    async fn test_fetch_summaries_skips_pages_without_extract() {
        let mock = MockHttpClient::new();
        mock.push_json(&extracts_body(&[(1, Some("text")), (2, None)], None));
        let client = WikipediaClient::new(mock);

        let summaries = client.fetch_summaries("en", &[1, 2]).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries.contains_key(&1));
        assert!(!summaries.contains_key(&2));
    }

    #[tokio::test]
    async fn test_fetch_summaries_trims_extracts() {
        let mock = MockHttpClient::new();
        mock.push_json(&extracts_body(&[(1, Some("padded \\n"))], None));
        let client = WikipediaClient::new(mock);

        let summaries = client.fetch_summaries("en", &[1]).await.unwrap();
        assert_eq!(summaries[&1], "padded");
    }

    #[tokio::test]
    async fn test_fetch_summary_single_page() {
        let mock = MockHttpClient::new();
        mock.push_json(&extracts_body(&[(42, Some("the answer"))], None));
        let client = WikipediaClient::new(mock);

        let page = WikipediaPage::new(42, "en", "Answer", pos(0.0, 0.0));
        let summary = client.fetch_summary(&page).await.unwrap();
        assert_eq!(summary.as_deref(), Some("the answer"));
    }

    #[tokio::test]
    async fn test_fetch_summary_absent_extract_is_none() {
        let mock = MockHttpClient::new();
        mock.push_json(&extracts_body(&[(42, None)], None));
        let client = WikipediaClient::new(mock);

        let page = WikipediaPage::new(42, "en", "Answer", pos(0.0, 0.0));
        let summary = client.fetch_summary(&page).await.unwrap();
        assert!(summary.is_none());
    }
}
