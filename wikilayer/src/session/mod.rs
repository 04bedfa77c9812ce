//! Session event loop.
//!
//! One session owns one cache, one debounce policy and one serialized
//! timeline. Simulator events arrive on a channel; network round trips run
//! as spawned tasks so further position ticks keep arriving, but their
//! results come back as messages and are applied on the loop, never
//! concurrently with other cache reads or writes.
//!
//! # Architecture
//!
//! ```text
//! SimulatorConnector ──SimulatorEvent──► Session loop ──watch──► display
//!                                          │      ▲
//!                                   spawn  │      │ FetchMsg
//!                                          ▼      │
//!                                     Wikipedia round trips
//! ```
//!
//! At most one geosearch round trip is in flight per session; ticks arriving
//! meanwhile are served from the warm cache. Every fetch task carries the
//! session epoch at spawn time, and the epoch is bumped on disconnect, so a
//! result landing after a disconnect cannot repopulate a cache that was just
//! cleared.

use std::collections::HashMap;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::geo::Position;
use crate::page::{PageView, WikipediaPage};
use crate::refresh::{RefreshConfig, RefreshService};
use crate::telemetry::RefreshMetrics;
use crate::wikipedia::{HttpClient, WikipediaClient, WikipediaError, DEFAULT_SEARCH_LIMIT};

/// Capacity of the simulator event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events a simulator connector feeds into a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulatorEvent {
    /// A connection to the simulator was established.
    Connected,
    /// New position data was received.
    Position(Position),
    /// The simulator exited or the connection was lost.
    Exited,
}

/// Results of spawned fetch tasks, applied back on the session timeline.
#[derive(Debug)]
enum FetchMsg {
    SearchDone {
        epoch: u64,
        origin: Position,
        result: Result<Vec<WikipediaPage>, WikipediaError>,
    },
    SummariesDone {
        epoch: u64,
        result: Result<HashMap<i64, String>, WikipediaError>,
    },
}

/// Handles for a session: the event sender given to connectors and the
/// watch receiver given to display consumers.
pub struct SessionHandle {
    /// Feed for simulator events.
    pub events: mpsc::Sender<SimulatorEvent>,
    /// Current display view; updated after every accepted tick and every
    /// applied cache change.
    pub views: watch::Receiver<Vec<PageView>>,
}

/// The serialized session timeline.
///
/// Created with [`Session::new`] and driven by [`Session::run`], typically
/// on a spawned task. Dropping the event sender ends the loop.
pub struct Session<H: HttpClient + 'static> {
    service: RefreshService<H>,
    epoch: u64,
    search_in_flight: bool,
    last_position: Option<Position>,
    events: mpsc::Receiver<SimulatorEvent>,
    fetch_tx: mpsc::Sender<FetchMsg>,
    fetch_rx: mpsc::Receiver<FetchMsg>,
    views: watch::Sender<Vec<PageView>>,
}

impl<H: HttpClient + 'static> Session<H> {
    /// Creates a session and its external handles.
    pub fn new(client: WikipediaClient<H>, config: RefreshConfig) -> (Self, SessionHandle) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (fetch_tx, fetch_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (view_tx, view_rx) = watch::channel(Vec::new());

        let session = Self {
            service: RefreshService::new(client, config),
            epoch: 0,
            search_in_flight: false,
            last_position: None,
            events: event_rx,
            fetch_tx,
            fetch_rx,
            views: view_tx,
        };
        let handle = SessionHandle {
            events: event_tx,
            views: view_rx,
        };
        (session, handle)
    }

    /// The session's shared metrics counters.
    pub fn metrics(&self) -> std::sync::Arc<RefreshMetrics> {
        self.service.metrics()
    }

    /// Runs the event loop until every event sender is dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                // Apply completed fetches before taking new ticks so a view
                // served for a queued position includes fresh pages.
                biased;

                Some(msg) = self.fetch_rx.recv() => self.on_fetch_msg(msg),
                event = self.events.recv() => match event {
                    Some(event) => self.on_event(event),
                    None => break,
                },
            }
        }
        debug!("Session event loop ended");
    }

    fn on_event(&mut self, event: SimulatorEvent) {
        match event {
            SimulatorEvent::Connected => {
                info!("Simulator connected");
                self.publish_empty();
            }
            SimulatorEvent::Position(position) => self.on_position(position),
            SimulatorEvent::Exited => self.on_exited(),
        }
    }

    fn on_position(&mut self, position: Position) {
        self.last_position = Some(position);

        // An outstanding round trip serializes the cycle: the tick is still
        // served below, but no second search is started.
        if self.search_in_flight {
            self.service.metrics().record_tick();
            self.service.metrics().record_tick_debounced();
        } else if self.service.decide(position) {
            self.spawn_search(position);
        }

        self.publish(position);
    }

    fn on_exited(&mut self) {
        info!("Simulator exited, clearing session state");
        self.epoch += 1;
        self.search_in_flight = false;
        self.last_position = None;
        self.service.reset();
        self.publish_empty();
    }

    fn on_fetch_msg(&mut self, msg: FetchMsg) {
        match msg {
            FetchMsg::SearchDone {
                epoch,
                origin,
                result,
            } => self.on_search_done(epoch, origin, result),
            FetchMsg::SummariesDone { epoch, result } => self.on_summaries_done(epoch, result),
        }
    }

    fn on_search_done(
        &mut self,
        epoch: u64,
        origin: Position,
        result: Result<Vec<WikipediaPage>, WikipediaError>,
    ) {
        if epoch != self.epoch {
            debug!("Dropping geosearch result from stale epoch {}", epoch);
            return;
        }
        self.search_in_flight = false;

        match result {
            Ok(pages) => {
                let missing = self.service.apply_search_results(origin, pages);
                if !missing.is_empty() {
                    self.spawn_summaries(missing.iter().map(|k| k.page_id).collect());
                }
                self.publish(self.last_position.unwrap_or(origin));
            }
            Err(e) => self.service.note_search_failure(&e),
        }
    }

    fn on_summaries_done(
        &mut self,
        epoch: u64,
        result: Result<HashMap<i64, String>, WikipediaError>,
    ) {
        if epoch != self.epoch {
            debug!("Dropping summaries from stale epoch {}", epoch);
            return;
        }

        match result {
            Ok(summaries) => {
                self.service.apply_summaries(summaries);
                if let Some(position) = self.last_position {
                    self.publish(position);
                }
            }
            Err(e) => {
                warn!("Summary fetch failed: {}", e);
                self.service.metrics().record_summary_failure();
            }
        }
    }

    fn spawn_search(&mut self, origin: Position) {
        self.search_in_flight = true;

        let client = self.service.client();
        let tx = self.fetch_tx.clone();
        let epoch = self.epoch;
        let config = self.service.config().clone();

        tokio::spawn(async move {
            let result = client
                .search_nearby(
                    &config.language,
                    origin,
                    config.search_radius_m,
                    DEFAULT_SEARCH_LIMIT,
                )
                .await;
            let _ = tx
                .send(FetchMsg::SearchDone {
                    epoch,
                    origin,
                    result,
                })
                .await;
        });
    }

    fn spawn_summaries(&self, page_ids: Vec<i64>) {
        let client = self.service.client();
        let tx = self.fetch_tx.clone();
        let epoch = self.epoch;
        let language = self.service.config().language.clone();

        tokio::spawn(async move {
            let result = client.fetch_summaries(&language, &page_ids).await;
            let _ = tx.send(FetchMsg::SummariesDone { epoch, result }).await;
        });
    }

    fn publish(&mut self, position: Position) {
        let view = self.service.view(position);
        self.views.send_replace(view);
    }

    fn publish_empty(&mut self) {
        self.views.send_replace(Vec::new());
    }
}
