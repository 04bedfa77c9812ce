//! Application bootstrap implementation.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

use crate::page::PageView;
use crate::refresh::RefreshConfig;
use crate::session::{Session, SessionHandle, SimulatorEvent};
use crate::telemetry::RefreshMetrics;
use crate::wikipedia::{ReqwestClient, WikipediaClient};

use super::config::AppConfig;
use super::error::AppError;

/// WikiLayer application with the session lifecycle wired up.
///
/// Owns the running session task and hands out the two external surfaces:
/// the event sender for a simulator connector and the view receiver for a
/// display layer.
pub struct WikiLayerApp {
    events: mpsc::Sender<SimulatorEvent>,
    views: watch::Receiver<Vec<PageView>>,
    metrics: Arc<RefreshMetrics>,
    session_task: JoinHandle<()>,
}

impl WikiLayerApp {
    /// Starts the application with the given configuration.
    ///
    /// Must be called within a Tokio runtime; the session event loop is
    /// spawned onto it.
    pub fn start(config: &AppConfig) -> Result<Self, AppError> {
        config.validate()?;

        let http = ReqwestClient::new().map_err(AppError::HttpClient)?;
        Self::start_with(WikipediaClient::new(http), config.to_refresh_config())
    }

    /// Starts the application around an existing client, letting tests
    /// inject a scripted HTTP layer.
    pub fn start_with<H>(
        client: WikipediaClient<H>,
        refresh_config: RefreshConfig,
    ) -> Result<Self, AppError>
    where
        H: crate::wikipedia::HttpClient + 'static,
    {
        let (session, SessionHandle { events, views }) = Session::new(client, refresh_config);
        let metrics = session.metrics();
        let session_task = tokio::spawn(session.run());
        info!("Session started");

        Ok(Self {
            events,
            views,
            metrics,
            session_task,
        })
    }

    /// Event sender for a simulator connector.
    pub fn events(&self) -> mpsc::Sender<SimulatorEvent> {
        self.events.clone()
    }

    /// Receiver of the current display view.
    pub fn views(&self) -> watch::Receiver<Vec<PageView>> {
        self.views.clone()
    }

    /// Shared metrics counters for status display.
    pub fn metrics(&self) -> Arc<RefreshMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Graceful shutdown: stops accepting events and waits for the session
    /// loop to drain.
    pub async fn shutdown(self) {
        drop(self.events);
        let _ = self.session_task.await;
        info!("Session shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Position;
    use crate::wikipedia::MockHttpClient;
    use std::time::Duration;

    #[tokio::test]
    async fn test_start_with_and_shutdown() {
        let mock = MockHttpClient::new();
        mock.push_json(r#"{ "query": { "geosearch": [] } }"#);
        let app = WikiLayerApp::start_with(
            WikipediaClient::new(mock),
            RefreshConfig::default().with_min_interval(Duration::ZERO),
        )
        .unwrap();

        let events = app.events();
        events
            .send(SimulatorEvent::Position(Position::new(0.0, 0.0).unwrap()))
            .await
            .unwrap();

        app.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = AppConfig {
            language: String::new(),
            ..AppConfig::default()
        };
        assert!(WikiLayerApp::start(&config).is_err());
    }
}
