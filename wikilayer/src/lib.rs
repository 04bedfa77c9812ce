//! WikiLayer - Nearby Wikipedia articles for flight simulators
//!
//! This library implements the position-driven refresh pipeline behind the
//! WikiLayer front-ends: a stream of aircraft positions drives debounced
//! Wikipedia geosearch requests, results are deduplicated into a
//! session-scoped page cache, summaries are backfilled in batches, and
//! display consumers receive a distance-sorted view of the pages within the
//! current display radius.
//!
//! # Architecture
//!
//! ```text
//! SimulatorConnector ──events──► Session ──views──► display layer
//!                                  │
//!                    RefreshPolicy │ PageCache
//!                                  ▼
//!                           WikipediaClient ──HTTP──► {lang}.wikipedia.org
//! ```

pub mod app;
pub mod cache;
pub mod geo;
pub mod log;
pub mod page;
pub mod refresh;
pub mod session;
pub mod simulator;
pub mod telemetry;
pub mod wikipedia;

pub use geo::Position;
pub use page::{PageView, WikipediaPage};
