//! Venue catalog: the court/arena model and JSON loading.

use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Access model of a venue, mirroring the court listing taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    Public,
    Private,
    Club,
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Club => write!(f, "club"),
        }
    }
}

/// A bookable sports venue. Coordinates are optional: listings created
/// without a pin carry no geodata and still appear in results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub kind: VenueKind,
    pub sport: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price_per_hour: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
}

impl Venue {
    /// Coordinates when both axes are known.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// Catalog loading errors.
#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Cannot read venue catalog: {}", e),
            Self::Parse(e) => write!(f, "Invalid venue catalog: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Load a venue catalog from a JSON array file.
pub fn load_catalog(path: &Path) -> Result<Vec<Venue>, CatalogError> {
    let data = fs::read_to_string(path).map_err(CatalogError::Io)?;
    serde_json::from_str(&data).map_err(CatalogError::Parse)
}

// ─── Built-in demo catalog ──────────────────────────────────────

struct BuiltinVenue {
    id: &'static str,
    name: &'static str,
    kind: VenueKind,
    sport: &'static str,
    city: &'static str,
    lat: Option<f64>,
    lon: Option<f64>,
    rating: Option<f64>,
    price_per_hour: Option<f64>,
    is_free: bool,
}

const BUILTIN_VENUES: &[BuiltinVenue] = &[
    BuiltinVenue {
        id: "ibirapuera-futsal",
        name: "Quadra Ibirapuera",
        kind: VenueKind::Public,
        sport: "futsal",
        city: "São Paulo",
        lat: Some(-23.5874), lon: Some(-46.6576),
        rating: Some(4.6), price_per_hour: None, is_free: true,
    },
    BuiltinVenue {
        id: "pinheiros-society",
        name: "Society Pinheiros",
        kind: VenueKind::Private,
        sport: "futebol society",
        city: "São Paulo",
        lat: Some(-23.5679), lon: Some(-46.7020),
        rating: Some(4.3), price_per_hour: Some(180.0), is_free: false,
    },
    BuiltinVenue {
        id: "paulistano-tenis",
        name: "Clube Paulistano Tênis",
        kind: VenueKind::Club,
        sport: "tênis",
        city: "São Paulo",
        lat: Some(-23.5610), lon: Some(-46.6622),
        rating: Some(4.8), price_per_hour: Some(120.0), is_free: false,
    },
    BuiltinVenue {
        id: "mauro-pinheiro-basquete",
        name: "Ginásio Mauro Pinheiro",
        kind: VenueKind::Public,
        sport: "basquete",
        city: "São Paulo",
        lat: Some(-23.5983), lon: Some(-46.6550),
        rating: Some(4.1), price_per_hour: None, is_free: true,
    },
    BuiltinVenue {
        id: "vila-madalena-volei",
        name: "Arena Vila Madalena",
        kind: VenueKind::Private,
        sport: "vôlei de praia",
        city: "São Paulo",
        lat: Some(-23.5539), lon: Some(-46.6909),
        rating: Some(4.5), price_per_hour: Some(90.0), is_free: false,
    },
    BuiltinVenue {
        id: "copacabana-volei",
        name: "Arena Copacabana",
        kind: VenueKind::Public,
        sport: "vôlei de praia",
        city: "Rio de Janeiro",
        lat: Some(-22.9719), lon: Some(-43.1825),
        rating: Some(4.7), price_per_hour: None, is_free: true,
    },
    // No pin: listed without coordinates.
    BuiltinVenue {
        id: "quadra-do-bairro",
        name: "Quadra do Bairro",
        kind: VenueKind::Public,
        sport: "futsal",
        city: "São Paulo",
        lat: None, lon: None,
        rating: None, price_per_hour: None, is_free: true,
    },
];

/// The built-in demo catalog: São Paulo venues plus one in Rio and one
/// without coordinates. Used when no catalog file is given, and by tests.
pub fn builtin_catalog() -> Vec<Venue> {
    BUILTIN_VENUES
        .iter()
        .map(|v| Venue {
            id: v.id.to_string(),
            name: v.name.to_string(),
            kind: v.kind,
            sport: v.sport.to_string(),
            city: Some(v.city.to_string()),
            latitude: v.lat,
            longitude: v.lon,
            rating: v.rating,
            price_per_hour: v.price_per_hour,
            is_free: v.is_free,
        })
        .collect()
}
