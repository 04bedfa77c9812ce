//! Wire types and errors for the Wikipedia action API.
//!
//! The deserialization structs mirror exactly the two responses the client
//! consumes: the `list=geosearch` query and the `prop=extracts` batch query
//! with its continuation marker.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while talking to the Wikipedia API.
///
/// A page without an extract is a normal outcome, not an error; it simply
/// does not appear in the fetched summaries.
#[derive(Debug, Error)]
pub enum WikipediaError {
    /// Request failed, timed out, or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not match the expected schema.
    #[error("Malformed API response: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Top-level geosearch response.
#[derive(Debug, Deserialize)]
pub(crate) struct GeosearchResponse {
    pub query: GeosearchQuery,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeosearchQuery {
    pub geosearch: Vec<GeosearchHit>,
}

/// A single geosearch result.
#[derive(Debug, Deserialize)]
pub(crate) struct GeosearchHit {
    pub pageid: i64,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
}

/// Top-level extracts response.
///
/// Presence of `continue` means more extract data follows for the same id
/// set; absence means the batch is complete.
#[derive(Debug, Deserialize)]
pub(crate) struct ExtractsResponse {
    #[serde(rename = "continue")]
    pub continuation: Option<Continuation>,
    pub query: ExtractsQuery,
}

/// Pagination marker carried into the follow-up request.
#[derive(Debug, Deserialize)]
pub(crate) struct Continuation {
    /// Opaque pagination offset for the extracts generator.
    pub excontinue: i64,
    /// Opaque continuation marker.
    #[serde(rename = "continue")]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractsQuery {
    /// Keyed by page id rendered as a string, as the API does.
    pub pages: HashMap<String, PageExtract>,
}

/// Extract data for a single page.
///
/// `extract` is absent when the API has no intro text for the page.
#[derive(Debug, Deserialize)]
pub(crate) struct PageExtract {
    pub pageid: i64,
    #[allow(dead_code)]
    pub title: String,
    pub extract: Option<String>,
}
