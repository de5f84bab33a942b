//! Position resolver — orchestrates the fallback chain.
//!
//! Auto flow:  fresh cache → IP geolocation → built-in default
//! Manual coordinates bypass the chain entirely.

use super::cache::PositionCache;
use super::types::{PositionError, PositionSource, ViewerPosition};
use serde::Deserialize;

// São Paulo centre, the product's default when no fix is available.
const DEFAULT_LAT: f64 = -23.5505;
const DEFAULT_LON: f64 = -46.6333;

/// The position resolver with its fallback pipeline.
pub struct PositionResolver {
    cache: PositionCache,
    offline: bool,
}

impl PositionResolver {
    pub fn new() -> Self {
        Self {
            cache: PositionCache::load(),
            offline: false,
        }
    }

    /// Create a resolver with a specific cache (for testing).
    pub fn with_cache(cache: PositionCache) -> Self {
        Self { cache, offline: false }
    }

    /// Set offline mode — skip network lookups.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    /// A manually supplied position. Does not touch the cache.
    pub fn from_manual(lat: f64, lon: f64) -> ViewerPosition {
        ViewerPosition {
            lat,
            lon,
            label: None,
            source: PositionSource::Manual,
        }
    }

    /// Resolve through the chain: fresh cache → IP → default.
    /// Never fails; a viewer always has a position.
    pub fn resolve(&mut self) -> ViewerPosition {
        if let Some(position) = self.cache.get() {
            return position;
        }
        self.refresh()
    }

    /// Force a live lookup, bypassing the cache window. Successful IP
    /// fixes are cached for the next call.
    pub fn refresh(&mut self) -> ViewerPosition {
        if !self.offline {
            if let Ok(position) = ip_geolocate() {
                self.cache.put(&position);
                return position;
            }
        }
        Self::default_position()
    }

    /// São Paulo centre with Fallback provenance.
    pub fn default_position() -> ViewerPosition {
        ViewerPosition {
            lat: DEFAULT_LAT,
            lon: DEFAULT_LON,
            label: Some("São Paulo, Brazil".into()),
            source: PositionSource::Fallback,
        }
    }
}

#[derive(Deserialize)]
struct IpApiResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    country_name: Option<String>,
}

/// Geolocate via the viewer's public IP.
fn ip_geolocate() -> Result<ViewerPosition, PositionError> {
    let response = ureq::get("https://ipapi.co/json/")
        .set("User-Agent", "Quadra/0.3")
        .call()
        .map_err(|e| PositionError::Network(e.to_string()))?;

    let r: IpApiResult = response
        .into_json()
        .map_err(|e| PositionError::InvalidResponse(e.to_string()))?;

    let lat = r
        .latitude
        .ok_or_else(|| PositionError::InvalidResponse("no latitude".into()))?;
    let lon = r
        .longitude
        .ok_or_else(|| PositionError::InvalidResponse("no longitude".into()))?;

    let label = match (r.city, r.country_name) {
        (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
        (Some(city), None) => Some(city),
        (None, Some(country)) => Some(country),
        (None, None) => None,
    };

    Ok(ViewerPosition {
        lat,
        lon,
        label,
        source: PositionSource::IpApi,
    })
}
