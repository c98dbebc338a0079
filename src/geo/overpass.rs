//! Overpass proximity backend (OpenStreetMap points of interest)
//!
//! Finds named amenities, shops, tourism and leisure features around a point
//! and returns them nearest first.

use crate::constants::api::{OVERPASS_URL, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{PlacesSearch, SearchRequest};
use crate::place::{haversine_distance, Address, Coordinates, Place, PlaceId, Region};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Overpass API backend
#[derive(Debug, Clone)]
pub struct OverpassSearch {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    #[serde(rename = "type")]
    kind: String,
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    /// Present for ways and relations with `out center`
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn coordinate(&self) -> Option<Coordinates> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some(Coordinates::new(lat, lon)),
            (_, _, Some(center)) => Some(Coordinates::new(center.lat, center.lon)),
            _ => None,
        }
    }

    fn into_place(self) -> Option<Place> {
        let coordinate = self.coordinate()?;
        let mut tags = self.tags;

        let address = Address {
            road: tags.remove("addr:street"),
            house_number: tags.remove("addr:housenumber"),
            locality: tags.remove("addr:city"),
        };

        Some(Place {
            id: PlaceId::new(format!("{}/{}", self.kind, self.id)),
            name: tags.remove("name").unwrap_or_default(),
            coordinate,
            address: address.summary(),
        })
    }
}

impl OverpassSearch {
    /// Create a backend pointed at the public Overpass instance
    pub fn new() -> Self {
        Self::with_url(OVERPASS_URL, USER_AGENT)
    }

    /// Create a backend pointed at a specific interpreter endpoint
    pub fn with_url(url: impl Into<String>, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    /// Overpass QL for named points of interest around the region center
    fn build_query(region: &Region, limit: usize) -> String {
        format!(
            "[out:json][timeout:25];\
             nwr(around:{:.0},{},{})[\"name\"][~\"^(amenity|shop|tourism|leisure)$\"~\".\"];\
             out center {};",
            region.radius_meters().max(1.0),
            region.center.lat,
            region.center.lng,
            limit
        )
    }

    /// Find points of interest in `region`, nearest to its center first
    pub async fn search_nearby(&self, region: &Region, limit: usize) -> Result<Vec<Place>> {
        let query = Self::build_query(region, limit);
        debug!(%query, "overpass search");

        let response = self
            .client
            .post(&self.url)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| Error::SearchFailed(format!("Overpass request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::SearchFailed(format!(
                "Overpass returned status: {}",
                response.status()
            )));
        }

        let data: OverpassResponse = response.json().await.map_err(|e| {
            Error::SearchFailed(format!("Failed to parse Overpass response: {}", e))
        })?;

        Ok(Self::rank(data.elements, region.center, limit))
    }

    fn rank(elements: Vec<OverpassElement>, center: Coordinates, limit: usize) -> Vec<Place> {
        let mut places: Vec<(f64, Place)> = elements
            .into_iter()
            .filter_map(OverpassElement::into_place)
            .map(|p| (haversine_distance(center, p.coordinate), p))
            .collect();

        places.sort_by(|a, b| a.0.total_cmp(&b.0));
        places.into_iter().take(limit).map(|(_, p)| p).collect()
    }
}

impl Default for OverpassSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacesSearch for OverpassSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>> {
        match request {
            SearchRequest::Nearby { region, limit } => self.search_nearby(region, *limit).await,
            SearchRequest::Text { .. } => Err(Error::SearchFailed(
                "Overpass does not support text search".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_response() -> serde_json::Value {
        json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 0.009, "lon": 0.0,
                 "tags": {"name": "Far Cafe", "amenity": "cafe"}},
                {"type": "way", "id": 2, "center": {"lat": 0.001, "lon": 0.0},
                 "tags": {"name": "Near Park", "leisure": "park",
                          "addr:street": "Main St", "addr:housenumber": "5", "addr:city": "Town"}},
                {"type": "relation", "id": 3, "tags": {"name": "No Geometry"}}
            ]
        })
    }

    #[test]
    fn test_build_query() {
        let region = Region::around(Coordinates::new(51.5, -0.12), 1000.0);
        let query = OverpassSearch::build_query(&region, 20);
        assert!(query.starts_with("[out:json]"));
        assert!(query.contains("around:500,51.5,-0.12"));
        assert!(query.ends_with("out center 20;"));
    }

    #[test]
    fn test_rank_orders_by_distance_and_skips_missing_geometry() {
        let response: OverpassResponse = serde_json::from_value(sample_response()).unwrap();
        let places = OverpassSearch::rank(response.elements, Coordinates::new(0.0, 0.0), 10);

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].id.as_str(), "way/2");
        assert_eq!(places[0].address, "Main St 5, Town");
        assert_eq!(places[1].name, "Far Cafe");
    }

    #[test]
    fn test_rank_applies_limit() {
        let response: OverpassResponse = serde_json::from_value(sample_response()).unwrap();
        let places = OverpassSearch::rank(response.elements, Coordinates::new(0.0, 0.0), 1);
        assert_eq!(places.len(), 1);
    }

    #[tokio::test]
    async fn test_search_nearby_against_mock_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/interpreter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_response()))
            .mount(&server)
            .await;

        let backend = OverpassSearch::with_url(
            format!("{}/api/interpreter", server.uri()),
            "place-picker-test",
        );
        let region = Region::around(Coordinates::new(0.0, 0.0), 2000.0);
        let places = backend.search_nearby(&region, 10).await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].name, "Near Park");
    }

    #[tokio::test]
    async fn test_search_nearby_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let backend = OverpassSearch::with_url(server.uri(), "place-picker-test");
        let region = Region::around(Coordinates::new(0.0, 0.0), 2000.0);
        let err = backend.search_nearby(&region, 10).await.unwrap_err();
        assert!(matches!(err, Error::SearchFailed(_)));
    }
}
