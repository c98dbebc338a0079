//! Nominatim text search backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for free-text place search.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::constants::api::{NOMINATIM_URL, USER_AGENT};
use crate::error::{Error, Result};
use crate::geo::{PlacesSearch, SearchRequest};
use crate::place::{Address, Coordinates, Place, PlaceId, Region};
use serde::Deserialize;
use tracing::debug;

/// Nominatim search backend
#[derive(Debug, Clone)]
pub struct NominatimSearch {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item (`format=jsonv2`)
#[derive(Debug, Deserialize)]
struct NominatimResult {
    #[serde(default)]
    osm_type: Option<String>,
    #[serde(default)]
    osm_id: Option<u64>,
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    house_number: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
}

impl NominatimAddress {
    fn into_address(self) -> Address {
        Address {
            road: self.road,
            house_number: self.house_number,
            locality: self.city.or(self.town).or(self.village).or(self.hamlet),
        }
    }
}

impl NominatimSearch {
    /// Create a backend pointed at the public Nominatim instance
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_URL, USER_AGENT)
    }

    /// Create a backend pointed at a specific Nominatim instance
    pub fn with_base_url(base_url: impl Into<String>, user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the search URL for a query, optionally biased to a region
    fn search_url(&self, query: &str, region: Option<&Region>, limit: usize) -> String {
        let mut url = format!(
            "{}/search?q={}&format=jsonv2&addressdetails=1&limit={}",
            self.base_url,
            urlencoding::encode(query),
            limit
        );

        if let Some(region) = region {
            let (south, west, north, east) = region.bounding_box();
            url.push_str(&format!("&viewbox={},{},{},{}", west, north, east, south));
        }

        url
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<Coordinates> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::SearchFailed(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::SearchFailed(format!("Invalid longitude: {}", lng)))?;
        Ok(Coordinates::new(lat, lng))
    }

    fn into_place(result: NominatimResult) -> Result<Place> {
        let coordinate = Self::parse_coords(&result.lat, &result.lon)?;

        let id = match (&result.osm_type, result.osm_id) {
            (Some(kind), Some(osm_id)) => PlaceId::new(format!("{}/{}", kind, osm_id)),
            _ => PlaceId::random(),
        };

        let name = result
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| result.display_name.split(',').next().map(|s| s.trim().to_string()))
            .unwrap_or_default();

        let summary = result
            .address
            .map(NominatimAddress::into_address)
            .unwrap_or_default()
            .summary();

        Ok(Place {
            id,
            name,
            coordinate,
            address: if summary.is_empty() {
                result.display_name
            } else {
                summary
            },
        })
    }

    /// Run a free-text search
    pub async fn search_text(
        &self,
        query: &str,
        region: Option<&Region>,
        limit: usize,
    ) -> Result<Vec<Place>> {
        let url = self.search_url(query, region, limit);
        debug!(%url, "nominatim search");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SearchFailed(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::SearchFailed(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response.json().await.map_err(|e| {
            Error::SearchFailed(format!("Failed to parse Nominatim response: {}", e))
        })?;

        results.into_iter().map(Self::into_place).collect()
    }

    /// Geocode a location name to its best match
    pub async fn geocode(&self, query: &str) -> Result<Option<Place>> {
        Ok(self.search_text(query, None, 1).await?.into_iter().next())
    }
}

impl Default for NominatimSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacesSearch for NominatimSearch {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>> {
        match request {
            SearchRequest::Text {
                query,
                region,
                limit,
            } => self.search_text(query, region.as_ref(), *limit).await,
            SearchRequest::Nearby { .. } => Err(Error::SearchFailed(
                "Nominatim does not support proximity search".to_string(),
            )),
        }
    }
}
