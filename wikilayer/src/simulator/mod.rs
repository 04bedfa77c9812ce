//! Flight simulator connectors.
//!
//! A connector owns the link to a simulator and feeds [`SimulatorEvent`]s
//! into a session channel: `Connected` once the link is up, `Position` for
//! every received position, `Exited` when the simulator goes away. Real
//! simulator bindings live behind the same [`SimulatorConnector`] trait as
//! the synthetic [`DummyConnector`] used for demos and tests.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::geo::Position;
use crate::session::SimulatorEvent;

/// Start position of the dummy flight, on the Baltic coast.
pub const DUMMY_START_LAT: f64 = 54.153131;
/// Start position of the dummy flight.
pub const DUMMY_START_LON: f64 = 13.778811;
/// Per-request drift of the dummy flight, in degrees.
pub const DUMMY_DRIFT_DEG: f64 = 0.001;

/// Errors from simulator connectors.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// An operation required an established connection.
    #[error("Not connected to a simulator")]
    NotConnected,

    /// The session is no longer accepting events.
    #[error("Session channel closed")]
    ChannelClosed,
}

/// Connector for flight simulators.
///
/// Implementations emit events into the session channel they were
/// constructed with. Calls are serialized by the owner; connectors do not
/// need internal locking.
pub trait SimulatorConnector: Send {
    /// Whether a connection to a simulator is established.
    fn is_connected(&self) -> bool;

    /// Initiates a connection. On success a `Connected` event is emitted.
    fn connect(&mut self) -> Result<(), ConnectorError>;

    /// Disconnects. An `Exited` event is emitted if a connection was up.
    fn disconnect(&mut self) -> Result<(), ConnectorError>;

    /// Requests the current position of the aircraft. On receiving, a
    /// `Position` event is emitted.
    fn request_current_position(&mut self) -> Result<(), ConnectorError>;
}

/// Synthetic connector that drifts steadily from a seed position.
///
/// Stands in for a real simulator binding in demos and tests; every
/// position request moves the aircraft by a fixed delta.
pub struct DummyConnector {
    connected: bool,
    current: Position,
    events: mpsc::Sender<SimulatorEvent>,
}

impl DummyConnector {
    /// Creates a dummy connector feeding the given session channel.
    pub fn new(events: mpsc::Sender<SimulatorEvent>) -> Self {
        Self {
            connected: false,
            current: Position::new(DUMMY_START_LAT, DUMMY_START_LON)
                .expect("dummy seed position is valid"),
            events,
        }
    }

    /// Creates a dummy connector starting at `seed`.
    pub fn with_seed(events: mpsc::Sender<SimulatorEvent>, seed: Position) -> Self {
        Self {
            connected: false,
            current: seed,
            events,
        }
    }

    fn emit(&self, event: SimulatorEvent) -> Result<(), ConnectorError> {
        match self.events.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(event)) => {
                // The session is behind; the next tick supersedes this one.
                warn!("Session busy, dropping simulator event {:?}", event);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(ConnectorError::ChannelClosed),
        }
    }
}

impl SimulatorConnector for DummyConnector {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), ConnectorError> {
        if self.connected {
            debug!("Already connected to dummy simulator");
            return Ok(());
        }
        info!("Connecting to dummy simulator");
        self.connected = true;
        self.emit(SimulatorEvent::Connected)
    }

    fn disconnect(&mut self) -> Result<(), ConnectorError> {
        if !self.connected {
            return Ok(());
        }
        info!("Disconnecting from dummy simulator");
        self.connected = false;
        self.emit(SimulatorEvent::Exited)
    }

    fn request_current_position(&mut self) -> Result<(), ConnectorError> {
        if !self.connected {
            return Err(ConnectorError::NotConnected);
        }

        let next = Position::new(
            self.current.latitude() - DUMMY_DRIFT_DEG,
            self.current.longitude() - DUMMY_DRIFT_DEG,
        )
        .map_err(|_| {
            // Drifted off the map; a real simulator cannot do this.
            warn!("Dummy flight left the coordinate domain, stopping drift");
            ConnectorError::NotConnected
        })?;
        self.current = next;

        debug!(
            "Dummy position {:.6}|{:.6}",
            next.latitude(),
            next.longitude()
        );
        self.emit(SimulatorEvent::Position(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> (DummyConnector, mpsc::Receiver<SimulatorEvent>) {
        let (tx, rx) = mpsc::channel(16);
        (DummyConnector::new(tx), rx)
    }

    #[tokio::test]
    async fn test_connect_emits_connected_event() {
        let (mut sim, mut rx) = connector();
        sim.connect().unwrap();

        assert!(sim.is_connected());
        assert_eq!(rx.recv().await.unwrap(), SimulatorEvent::Connected);
    }

    #[tokio::test]
    async fn test_connect_twice_is_idempotent() {
        let (mut sim, mut rx) = connector();
        sim.connect().unwrap();
        sim.connect().unwrap();

        assert_eq!(rx.recv().await.unwrap(), SimulatorEvent::Connected);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_position_request_before_connect_fails() {
        let (mut sim, _rx) = connector();
        let result = sim.request_current_position();
        assert!(matches!(result, Err(ConnectorError::NotConnected)));
    }

    #[tokio::test]
    async fn test_positions_drift_by_fixed_delta() {
        let (mut sim, mut rx) = connector();
        sim.connect().unwrap();
        rx.recv().await.unwrap();

        sim.request_current_position().unwrap();
        sim.request_current_position().unwrap();

        let first = match rx.recv().await.unwrap() {
            SimulatorEvent::Position(p) => p,
            other => panic!("unexpected event: {:?}", other),
        };
        let second = match rx.recv().await.unwrap() {
            SimulatorEvent::Position(p) => p,
            other => panic!("unexpected event: {:?}", other),
        };

        assert!((first.latitude() - (DUMMY_START_LAT - DUMMY_DRIFT_DEG)).abs() < 1e-9);
        assert!((second.latitude() - (DUMMY_START_LAT - 2.0 * DUMMY_DRIFT_DEG)).abs() < 1e-9);
        assert!((second.longitude() - (DUMMY_START_LON - 2.0 * DUMMY_DRIFT_DEG)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_disconnect_emits_exited_event() {
        let (mut sim, mut rx) = connector();
        sim.connect().unwrap();
        rx.recv().await.unwrap();

        sim.disconnect().unwrap();
        assert!(!sim.is_connected());
        assert_eq!(rx.recv().await.unwrap(), SimulatorEvent::Exited);
    }
}
