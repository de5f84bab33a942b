use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::filter::{ProximityQuery, RankedVenue, DEFAULT_RADIUS_KM};
use crate::geo::{self, Coordinates};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/nearby ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
    pub sport: Option<String>,
    pub limit: Option<usize>,
    pub include_unknown: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct NearbyResponse {
    pub origin: Coordinates,
    pub radius_km: f64,
    pub count: usize,
    pub venues: Vec<RankedVenue>,
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let lat = params
        .lat
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'lat' parameter"))?;
    let lon = params
        .lon
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Missing 'lon' parameter"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ));
    }

    let origin = Coordinates::new(lat, lon);
    let mut query = ProximityQuery::new(origin)
        .with_radius(params.radius.unwrap_or(DEFAULT_RADIUS_KM))
        .include_unknown(params.include_unknown.unwrap_or(true));
    if let Some(sport) = params.sport {
        query = query.with_sport(sport);
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }

    let venues = query.rank(&state.venues);
    Ok(Json(NearbyResponse {
        origin,
        radius_km: query.radius_km(),
        count: venues.len(),
        venues,
    }))
}

// ─── GET /api/distance ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceParams {
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    /// Great-circle distance in km, or null when either point is unknown.
    pub distance_km: Option<f64>,
    pub label: String,
}

pub async fn distance(Query(params): Query<DistanceParams>) -> Json<DistanceResponse> {
    let from = Coordinates::from_parts(params.from_lat, params.from_lon);
    let to = Coordinates::from_parts(params.to_lat, params.to_lon);
    let distance_km = geo::distance_km(from, to);

    Json(DistanceResponse {
        label: geo::format_distance(distance_km),
        distance_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::venue::builtin_catalog;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            venues: builtin_catalog(),
        })
    }

    #[tokio::test]
    async fn test_nearby_ranked_response() {
        let params = NearbyParams {
            lat: Some(-23.5505),
            lon: Some(-46.6333),
            radius: Some(10.0),
            sport: None,
            limit: None,
            include_unknown: Some(false),
        };

        let Json(body) = nearby(State(test_state()), Query(params)).await.unwrap();
        assert_eq!(body.count, body.venues.len());
        assert!(body.count >= 5);
        assert!((body.radius_km - 10.0).abs() < 1e-9);
        for pair in body.venues.windows(2) {
            assert!(pair[0].distance_km.unwrap() <= pair[1].distance_km.unwrap());
        }
    }

    #[tokio::test]
    async fn test_nearby_missing_lat_is_bad_request() {
        let params = NearbyParams {
            lat: None,
            lon: Some(-46.6333),
            radius: None,
            sport: None,
            limit: None,
            include_unknown: None,
        };

        let err = nearby(State(test_state()), Query(params)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nearby_out_of_range_coordinates() {
        let params = NearbyParams {
            lat: Some(123.0),
            lon: Some(-46.6333),
            radius: None,
            sport: None,
            limit: None,
            include_unknown: None,
        };

        let err = nearby(State(test_state()), Query(params)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_distance_known_points() {
        let params = DistanceParams {
            from_lat: Some(-23.5505),
            from_lon: Some(-46.6333),
            to_lat: Some(-22.9068),
            to_lon: Some(-43.1729),
        };

        let Json(body) = distance(Query(params)).await;
        let d = body.distance_km.unwrap();
        assert!(d > 357.0 && d < 362.0);
        assert!(body.label.ends_with(" km"));
    }

    #[tokio::test]
    async fn test_distance_unknown_point() {
        let params = DistanceParams {
            from_lat: Some(-23.5505),
            from_lon: Some(-46.6333),
            to_lat: None,
            to_lon: None,
        };

        let Json(body) = distance(Query(params)).await;
        assert!(body.distance_km.is_none());
        assert_eq!(body.label, "-- km");
    }
}
