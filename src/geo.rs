//! Great-circle proximity math.
//!
//! Haversine distance on a spherical Earth (R = 6371 km), display
//! formatting, and radius membership. Absent coordinates flow through as
//! `None` rather than failing: a venue without geodata has an unknown
//! distance, not an error.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEG: f64 = PI / 180.0;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Placeholder rendered when a distance is unknown.
pub const UNKNOWN_DISTANCE_LABEL: &str = "-- km";

/// A known coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Build from per-axis optionals. Both axes must be present; a record
    /// with only one axis is treated as unlocated.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Option<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Some(Self { lat, lon }),
            _ => None,
        }
    }
}

/// Great-circle distance in kilometers between two known points.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat) * DEG;
    let d_lon = (b.lon - a.lon) * DEG;

    let h = (d_lat / 2.0).sin().powi(2)
        + (a.lat * DEG).cos() * (b.lat * DEG).cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance between two possibly-unknown points. `None` in, `None` out.
pub fn distance_km(a: Option<Coordinates>, b: Option<Coordinates>) -> Option<f64> {
    Some(haversine_km(a?, b?))
}

/// Format a distance for display: meters under 1 km ("500 m"), otherwise
/// one decimal of kilometers ("2.5 km"), `"-- km"` when unknown.
/// Fixed numeric format, not locale-sensitive.
pub fn format_distance(km: Option<f64>) -> String {
    match km {
        None => UNKNOWN_DISTANCE_LABEL.to_string(),
        Some(km) if km < 1.0 => format!("{} m", (km * 1000.0).round() as i64),
        Some(km) => format!("{:.1} km", km),
    }
}

/// Radius membership, boundary-inclusive. An unknown distance counts as
/// inside: a venue is never hidden just because its location is missing.
/// Callers that need that policy explicit (or inverted) go through
/// [`ProximityQuery`](crate::filter::ProximityQuery).
pub fn is_within_radius(a: Option<Coordinates>, b: Option<Coordinates>, radius_km: f64) -> bool {
    match distance_km(a, b) {
        None => true,
        Some(d) => d <= radius_km,
    }
}
