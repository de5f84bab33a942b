//! Core types for the viewer-position subsystem.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the viewer's position was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSource {
    Manual,
    Cache,
    IpApi,
    Fallback,
}

impl fmt::Display for PositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "Manual"),
            Self::Cache => write!(f, "Cache"),
            Self::IpApi => write!(f, "IP"),
            Self::Fallback => write!(f, "Built-in"),
        }
    }
}

/// The viewer's resolved position with provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerPosition {
    pub lat: f64,
    pub lon: f64,
    /// Place label from the provider (e.g. "São Paulo, Brazil").
    #[serde(default)]
    pub label: Option<String>,
    pub source: PositionSource,
}

impl ViewerPosition {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    pub fn display_line(&self) -> String {
        let place = self.label.as_deref().unwrap_or("Unknown place");
        format!("{} ({:.4}, {:.4}) [{}]", place, self.lat, self.lon, self.source)
    }
}

/// Position resolution errors.
#[derive(Debug)]
pub enum PositionError {
    Network(String),
    InvalidResponse(String),
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::InvalidResponse(msg) => write!(f, "Invalid API response: {}", msg),
        }
    }
}

impl std::error::Error for PositionError {}
