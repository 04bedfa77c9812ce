//! Wikipedia API client
//!
//! This module wraps the two action-API endpoints the refresh pipeline
//! consumes: `list=geosearch` for finding pages near a coordinate and
//! `prop=extracts` for backfilling intro summaries.
//!
//! The HTTP layer sits behind the [`HttpClient`] trait so every network
//! interaction can be scripted in tests.

mod client;
mod http;
mod types;

pub use client::{
    WikipediaClient, DEFAULT_SEARCH_LIMIT, GEOSEARCH_MAX_RADIUS_M, SUMMARY_BATCH_SIZE,
};
pub use http::{BoxFuture, HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS, USER_AGENT};
pub use types::WikipediaError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
