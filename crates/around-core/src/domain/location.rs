use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Mean earth radius in kilometres, as used by the search engine's arc distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Create a location, rejecting coordinates outside the valid ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::Validation(format!(
                "latitude {lat} must be between -90 and 90"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(DomainError::Validation(format!(
                "longitude {lon} must be between -180 and 180"
            )));
        }

        Ok(Self { lat, lon })
    }

    /// Parse a location from raw form values.
    pub fn parse(lat: &str, lon: &str) -> Result<Self, DomainError> {
        let lat = parse_coordinate("lat", lat)?;
        let lon = parse_coordinate("lon", lon)?;
        Self::new(lat, lon)
    }

    /// Great-circle distance to `other` in kilometres (haversine).
    pub fn distance_km(&self, other: &Location) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, DomainError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| DomainError::Validation(format!("{field} must be a number, got {raw:?}")))
}

/// Search radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance(f64);

impl Distance {
    pub const DEFAULT_KM: f64 = 200.0;

    pub fn from_km(km: f64) -> Result<Self, DomainError> {
        if !km.is_finite() || km <= 0.0 {
            return Err(DomainError::Validation(format!(
                "range must be a positive number of kilometres, got {km}"
            )));
        }
        Ok(Self(km))
    }

    pub fn km(&self) -> f64 {
        self.0
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self(Self::DEFAULT_KM)
    }
}

/// Renders the engine distance string, e.g. `200km`.
impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}km", self.0)
    }
}
