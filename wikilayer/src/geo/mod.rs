//! Geographic coordinate module
//!
//! Provides the [`Position`] type used throughout the refresh pipeline and
//! the great-circle distance calculation between two positions.

use thiserror::Error;

/// Earth radius in meters used for great-circle distances.
///
/// Matches the radius the upstream geosearch results are measured against,
/// so cached distances and API radii agree.
pub const EARTH_RADIUS_M: f64 = 6_376_500.0;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors for invalid geographic input.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90].
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180].
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A position on earth defined by latitude and longitude in degrees.
///
/// Positions are immutable; movement is modeled as a stream of new values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    /// Creates a position, validating the coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in meters.
    ///
    /// Uses the haversine formula with [`EARTH_RADIUS_M`]. The result is
    /// rounded to one decimal place, which is well below the accuracy of the
    /// formula itself and keeps displayed distances stable.
    pub fn distance_m(&self, other: Position) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lon1 = self.longitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlon = other.longitude.to_radians() - lon1;

        let h = ((lat2 - lat1) / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let d = EARTH_RADIUS_M * 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        (d * 10.0).round() / 10.0
    }
}
