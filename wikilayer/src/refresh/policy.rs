//! Debounce state machine gating geosearch requests.

use std::time::{Duration, Instant};

use crate::geo::Position;

/// Internal policy state.
#[derive(Debug, Clone, Copy)]
enum PolicyState {
    /// No request has been issued yet; the first position always fetches.
    Idle,

    /// A request has been issued from `origin` at `fetched_at`.
    Tracking {
        origin: Position,
        fetched_at: Instant,
    },
}

/// Decides whether a position tick should trigger a new geosearch request.
///
/// The first position after construction or [`reset`](Self::reset) always
/// fetches. After that, a fetch requires both axes of the debounce to pass:
/// travel distance from the last request origin above `min_travel_m`, and
/// wall-clock time since the last request at least `min_interval`. The time
/// axis prevents redundant queries while loitering near the distance
/// boundary.
#[derive(Debug)]
pub struct RefreshPolicy {
    state: PolicyState,
    min_travel_m: f64,
    min_interval: Duration,
}

impl RefreshPolicy {
    /// Creates a policy in the Idle state.
    pub fn new(min_travel_m: f64, min_interval: Duration) -> Self {
        Self {
            state: PolicyState::Idle,
            min_travel_m,
            min_interval,
        }
    }

    /// Whether a request should be issued for `current` now.
    pub fn should_fetch(&self, current: Position) -> bool {
        self.should_fetch_at(current, Instant::now())
    }

    /// Whether a request should be issued for `current` at `now`.
    ///
    /// Takes the clock explicitly so tests can drive the time axis.
    pub fn should_fetch_at(&self, current: Position, now: Instant) -> bool {
        match self.state {
            PolicyState::Idle => true,
            PolicyState::Tracking { origin, fetched_at } => {
                current.distance_m(origin) > self.min_travel_m
                    && now.duration_since(fetched_at) >= self.min_interval
            }
        }
    }

    /// Records that a request was issued from `origin`.
    pub fn note_fetch(&mut self, origin: Position) {
        self.note_fetch_at(origin, Instant::now());
    }

    /// Records that a request was issued from `origin` at `now`.
    pub fn note_fetch_at(&mut self, origin: Position, now: Instant) {
        self.state = PolicyState::Tracking {
            origin,
            fetched_at: now,
        };
    }

    /// Position the last request was issued from, if any.
    pub fn last_origin(&self) -> Option<Position> {
        match self.state {
            PolicyState::Idle => None,
            PolicyState::Tracking { origin, .. } => Some(origin),
        }
    }

    /// Returns to the Idle state, so the next position fetches
    /// unconditionally. Invoked on disconnect.
    pub fn reset(&mut self) {
        self.state = PolicyState::Idle;
    }
}
