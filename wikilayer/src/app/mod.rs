//! Application bootstrap and lifecycle management.
//!
//! This module provides the `WikiLayerApp` type which wires the Wikipedia
//! client, the session event loop and the display channel together from a
//! single [`AppConfig`], so front-ends only deal with three things: a
//! config, an event sender for their simulator connector, and a view
//! receiver for their display.
//!
//! # Example
//!
//! ```ignore
//! use wikilayer::app::{AppConfig, WikiLayerApp};
//!
//! let config = AppConfig::load(Path::new("wikilayer.ini"))?;
//! let app = WikiLayerApp::start(&config)?;
//!
//! let mut connector = DummyConnector::new(app.events());
//! let mut views = app.views();
//!
//! // ... drive the connector, render views.changed() updates ...
//!
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::WikiLayerApp;
pub use config::{
    AppConfig, DEFAULT_REFRESH_INTERVAL_SECS, DISPLAY_RADIUS_OPTIONS_M, LANGUAGE_OPTIONS,
};
pub use error::AppError;
