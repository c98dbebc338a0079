//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::geo::ip_location::IpLocation;
use crate::geo::{PlacesSearch, SearchRequest};
use crate::place::{Coordinates, Place, Region};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/formats", get(formats_handler))
        .route("/api/search", get(search_handler))
        .route("/api/nearby", get(nearby_handler))
        .route("/api/location", get(location_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(code: &str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    /// Upstream failures are the gateway's fault, everything else the caller's
    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "SEARCH_ERROR" | "LOCATION_ERROR" | "INTERNAL_ERROR" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Config(_) => "CONFIG_ERROR",
            Error::SearchFailed(_) | Error::Http(_) | Error::Json(_) => "SEARCH_ERROR",
            Error::LocationUnavailable(_) => "LOCATION_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(code, err.to_string())
    }
}

/// Places list response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
    pub count: usize,
}

impl From<Vec<Place>> for PlacesResponse {
    fn from(places: Vec<Place>) -> Self {
        Self {
            count: places.len(),
            places,
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
    /// Text search endpoint
    pub nominatim_url: String,
    /// Nearby search endpoint
    pub overpass_url: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        nominatim_url: state.config.search.nominatim_url.clone(),
        overpass_url: state.config.search.overpass_url.clone(),
    })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

/// Optional `lat`/`lng` pair; both or neither
fn optional_center(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinates>, ApiError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let center = Coordinates::new(lat, lng);
            center.validate()?;
            Ok(Some(center))
        }
        (None, None) => Ok(None),
        _ => Err(ApiError::new(
            "INVALID_COORDINATES",
            "lat and lng must be given together",
        )),
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub limit: Option<usize>,
}

/// Text search, biased to `lat`/`lng` when given
///
/// GET /api/search?q=&lat=&lng=&limit=
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let config = &state.config;
    let query = params.q.as_deref().unwrap_or("").trim().to_string();

    if query.chars().count() < config.picker.min_query_len.max(1) {
        return Err(ApiError::new(
            "INVALID_QUERY",
            format!(
                "Query must be at least {} characters",
                config.picker.min_query_len.max(1)
            ),
        ));
    }

    let span = config.picker.query_span_degrees;
    let region = optional_center(params.lat, params.lng)?
        .map(|center| Region::with_span(center, span, span));

    let request = SearchRequest::Text {
        query,
        region,
        limit: params
            .limit
            .unwrap_or(config.search.query_limit)
            .min(config.picker.max_results),
    };

    let places = state.places.search(&request).await?;
    Ok(Json(places.into()))
}

/// Nearby query parameters
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub limit: Option<usize>,
}

/// Points of interest around a location, nearest first
///
/// GET /api/nearby?lat=&lng=&radius=&limit=
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let config = &state.config;
    let center = optional_center(params.lat, params.lng)?
        .ok_or_else(|| ApiError::new("INVALID_COORDINATES", "lat and lng are required"))?;

    let radius = params.radius.unwrap_or(config.picker.nearby_radius_meters);
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ApiError::new("INVALID_RADIUS", "Radius must be a positive number"));
    }

    let request = SearchRequest::Nearby {
        region: Region::around(center, radius),
        limit: params
            .limit
            .unwrap_or(config.search.nearby_limit)
            .min(config.picker.max_results),
    };

    let places = state.places.search(&request).await?;
    Ok(Json(places.into()))
}

/// Get current location from IP address
///
/// GET /api/location
async fn location_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<IpLocation>, ApiError> {
    let location = state.locator.locate().await?;
    Ok(Json(location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::ip_location::IpLocator;
    use crate::geo::osm::OsmPlaces;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// State whose backends all point at `upstream`
    fn create_test_state(upstream: &str) -> Arc<AppState> {
        let mut config = Config::default();
        config.search.nominatim_url = upstream.to_string();
        config.search.overpass_url = format!("{}/api/interpreter", upstream);
        let places = OsmPlaces::from_config(&config);
        let locator = IpLocator::without_cache().with_api_url(format!("{}/json", upstream));
        Arc::new(AppState::with_backends(config, places, locator))
    }

    async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        let status: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(status.running);
        assert_eq!(status.nominatim_url, "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/formats").await;

        assert_eq!(status, StatusCode::OK);
        let formats: FormatsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(formats.formats.len(), 4);
    }

    #[tokio::test]
    async fn test_search_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "museum"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"osm_type": "way", "osm_id": 7, "lat": "48.86", "lon": "2.33",
                 "name": "Louvre", "display_name": "Louvre, Paris"}
            ])))
            .mount(&server)
            .await;

        let state = create_test_state(&server.uri());
        let (status, body) = get_json(state, "/api/search?q=museum&lat=48.8&lng=2.3").await;

        assert_eq!(status, StatusCode::OK);
        let response: PlacesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.count, 1);
        assert_eq!(response.places[0].id.as_str(), "way/7");
    }

    #[tokio::test]
    async fn test_search_rejects_short_query() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/search?q=a").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_QUERY");
    }

    #[tokio::test]
    async fn test_search_rejects_half_a_location() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/search?q=cafe&lat=10").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let state = create_test_state(&server.uri());
        let (status, body) = get_json(state, "/api/search?q=museum").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "SEARCH_ERROR");
    }

    #[tokio::test]
    async fn test_nearby_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "elements": [
                    {"type": "node", "id": 1, "lat": 51.5010, "lon": -0.1200,
                     "tags": {"name": "Far", "amenity": "cafe"}},
                    {"type": "node", "id": 2, "lat": 51.5001, "lon": -0.1200,
                     "tags": {"name": "Near", "amenity": "pub"}}
                ]
            })))
            .mount(&server)
            .await;

        let state = create_test_state(&server.uri());
        let (status, body) = get_json(state, "/api/nearby?lat=51.5&lng=-0.12&radius=500").await;

        assert_eq!(status, StatusCode::OK);
        let response: PlacesResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.places[0].name, "Near");
        assert_eq!(response.places[1].name, "Far");
    }

    #[tokio::test]
    async fn test_nearby_invalid_coordinates() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/nearby?lat=91&lng=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_nearby_invalid_radius() {
        let state = create_test_state("http://127.0.0.1:9");
        let (status, body) = get_json(state, "/api/nearby?lat=10&lng=10&radius=-5").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RADIUS");
    }

    #[tokio::test]
    async fn test_nearby_non_finite_radius() {
        for radius in ["NaN", "inf"] {
            let state = create_test_state("http://127.0.0.1:9");
            let uri = format!("/api/nearby?lat=10&lng=10&radius={}", radius);
            let (status, body) = get_json(state, &uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "radius={}", radius);
            assert_eq!(body["code"], "INVALID_RADIUS");
        }
    }

    #[tokio::test]
    async fn test_location_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success", "lat": 52.52, "lon": 13.405,
                "city": "Berlin", "regionName": "Berlin", "country": "Germany"
            })))
            .mount(&server)
            .await;

        let state = create_test_state(&server.uri());
        let (status, body) = get_json(state, "/api/location").await;

        assert_eq!(status, StatusCode::OK);
        let location: IpLocation = serde_json::from_value(body).unwrap();
        assert_eq!(location.coordinate, Coordinates::new(52.52, 13.405));
    }

    #[tokio::test]
    async fn test_location_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "fail"})))
            .mount(&server)
            .await;

        let state = create_test_state(&server.uri());
        let (status, body) = get_json(state, "/api/location").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "LOCATION_ERROR");
    }
}
