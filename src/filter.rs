//! Proximity ranking for venue lists.
//!
//! The query surface of the nearby-venues search: radius filter, optional
//! sport filter, nearest-first ordering, result limit. The unknown-location
//! policy is an explicit flag here, not a hidden default inside the
//! geometry. Geometry reports `None`; the query decides what that means.

use crate::geo::{self, Coordinates};
use crate::venue::Venue;
use serde::Serialize;
use std::cmp::Ordering;

/// Default search radius in km.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Maximum search radius in km.
pub const MAX_RADIUS_KM: f64 = 50.0;

/// Distances under this read as "nearby" in listings.
pub const NEARBY_THRESHOLD_KM: f64 = 5.0;

/// A proximity query against a venue list.
#[derive(Debug, Clone)]
pub struct ProximityQuery {
    origin: Coordinates,
    radius_km: f64,
    include_unknown: bool,
    sport: Option<String>,
    limit: Option<usize>,
}

impl ProximityQuery {
    /// Query with the default radius. Unlocated venues are included:
    /// the product rule is that missing geodata never hides a listing.
    pub fn new(origin: Coordinates) -> Self {
        Self {
            origin,
            radius_km: DEFAULT_RADIUS_KM,
            include_unknown: true,
            sport: None,
            limit: None,
        }
    }

    /// Set the radius, clamped to `0..=MAX_RADIUS_KM`.
    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km.clamp(0.0, MAX_RADIUS_KM);
        self
    }

    /// Filter by sport (case-insensitive substring match, as the map
    /// screen filter behaves).
    pub fn with_sport(mut self, sport: impl Into<String>) -> Self {
        self.sport = Some(sport.into());
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Choose the unknown-location policy. `false` hides venues without
    /// coordinates instead of including them.
    pub fn include_unknown(mut self, include: bool) -> Self {
        self.include_unknown = include;
        self
    }

    pub fn origin(&self) -> Coordinates {
        self.origin
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Rank a venue list: annotate with distance from the origin, apply
    /// the radius and sport filters, sort nearest first with unknown
    /// distances last, truncate to the limit.
    pub fn rank(&self, venues: &[Venue]) -> Vec<RankedVenue> {
        let mut ranked: Vec<RankedVenue> = venues
            .iter()
            .filter(|v| self.matches_sport(v))
            .filter_map(|v| {
                let distance_km = geo::distance_km(Some(self.origin), v.coordinates());
                match distance_km {
                    None if !self.include_unknown => None,
                    Some(d) if d > self.radius_km => None,
                    _ => Some(RankedVenue::new(v.clone(), distance_km)),
                }
            })
            .collect();

        ranked.sort_by(|a, b| match (a.distance_km, b.distance_km) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        if let Some(limit) = self.limit {
            ranked.truncate(limit);
        }
        ranked
    }

    fn matches_sport(&self, venue: &Venue) -> bool {
        match &self.sport {
            None => true,
            Some(s) => venue.sport.to_lowercase().contains(&s.to_lowercase()),
        }
    }
}

/// A venue annotated with its distance from the query origin.
#[derive(Debug, Clone, Serialize)]
pub struct RankedVenue {
    pub venue: Venue,
    /// Great-circle distance in km, or null when the venue has no pin.
    pub distance_km: Option<f64>,
    /// Preformatted badge string ("4.2 km", "500 m", "-- km").
    pub distance_label: String,
    /// Known distance under [`NEARBY_THRESHOLD_KM`].
    pub nearby: bool,
}

impl RankedVenue {
    fn new(venue: Venue, distance_km: Option<f64>) -> Self {
        Self {
            distance_label: geo::format_distance(distance_km),
            nearby: matches!(distance_km, Some(d) if d < NEARBY_THRESHOLD_KM),
            venue,
            distance_km,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::builtin_catalog;

    const SAO_PAULO: Coordinates = Coordinates { lat: -23.5505, lon: -46.6333 };

    #[test]
    fn test_rank_nearest_first() {
        let ranked = ProximityQuery::new(SAO_PAULO)
            .include_unknown(false)
            .rank(&builtin_catalog());

        assert!(!ranked.is_empty());
        for pair in ranked.windows(2) {
            assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
        }
    }

    #[test]
    fn test_unknown_included_by_default_and_sorted_last() {
        let ranked = ProximityQuery::new(SAO_PAULO).rank(&builtin_catalog());

        let last = ranked.last().unwrap();
        assert_eq!(last.venue.id, "quadra-do-bairro");
        assert!(last.distance_km.is_none());
        assert_eq!(last.distance_label, "-- km");
        assert!(!last.nearby);
    }

    #[test]
    fn test_exclude_unknown() {
        let ranked = ProximityQuery::new(SAO_PAULO)
            .include_unknown(false)
            .rank(&builtin_catalog());

        assert!(ranked.iter().all(|r| r.distance_km.is_some()));
    }

    #[test]
    fn test_radius_excludes_far_venues() {
        // Rio is ~360 km from São Paulo centre; even the max radius
        // keeps it out.
        let ranked = ProximityQuery::new(SAO_PAULO)
            .with_radius(MAX_RADIUS_KM)
            .rank(&builtin_catalog());

        assert!(ranked.iter().all(|r| r.venue.id != "copacabana-volei"));
    }

    #[test]
    fn test_radius_clamped_to_max() {
        let query = ProximityQuery::new(SAO_PAULO).with_radius(500.0);
        assert!((query.radius_km() - MAX_RADIUS_KM).abs() < 1e-9);

        let query = ProximityQuery::new(SAO_PAULO).with_radius(-3.0);
        assert!(query.radius_km().abs() < 1e-9);
    }

    #[test]
    fn test_sport_filter_case_insensitive_substring() {
        let ranked = ProximityQuery::new(SAO_PAULO)
            .with_sport("FUTSAL")
            .rank(&builtin_catalog());

        assert!(!ranked.is_empty());
        assert!(ranked.iter().all(|r| r.venue.sport.contains("futsal")));

        // "futebol society" matches a bare "futebol" query
        let ranked = ProximityQuery::new(SAO_PAULO)
            .with_sport("futebol")
            .rank(&builtin_catalog());
        assert!(ranked.iter().any(|r| r.venue.id == "pinheiros-society"));
    }

    #[test]
    fn test_limit_truncates_after_sort() {
        let all = ProximityQuery::new(SAO_PAULO)
            .include_unknown(false)
            .rank(&builtin_catalog());
        let top2 = ProximityQuery::new(SAO_PAULO)
            .include_unknown(false)
            .with_limit(2)
            .rank(&builtin_catalog());

        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].venue.id, all[0].venue.id);
        assert_eq!(top2[1].venue.id, all[1].venue.id);
    }

    #[test]
    fn test_nearby_flag() {
        let ranked = ProximityQuery::new(SAO_PAULO)
            .include_unknown(false)
            .rank(&builtin_catalog());

        // Ibirapuera is ~4.7 km from the centre, Pinheiros ~7.3 km
        let ibirapuera = ranked.iter().find(|r| r.venue.id == "ibirapuera-futsal").unwrap();
        assert!(ibirapuera.nearby);
        let pinheiros = ranked.iter().find(|r| r.venue.id == "pinheiros-society").unwrap();
        assert!(!pinheiros.nearby);
    }
}
