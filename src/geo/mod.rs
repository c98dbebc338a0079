//! Places search and geolocation collaborators
//!
//! Provides the two asynchronous services the picker coordinates:
//! - `PlacesSearch`: text query or region to a ranked list of places
//! - `GeolocationSource`: a stream of coordinate + accuracy fixes

pub mod fixed;
pub mod ip_location;
pub mod nominatim;
pub mod osm;
pub mod overpass;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::place::{Coordinates, Place, Region};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// What to search for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchRequest {
    /// Free-text query, optionally biased to a region
    Text {
        query: String,
        region: Option<Region>,
        limit: usize,
    },
    /// Points of interest inside a region
    Nearby { region: Region, limit: usize },
}

impl SearchRequest {
    pub fn limit(&self) -> usize {
        match self {
            Self::Text { limit, .. } | Self::Nearby { limit, .. } => *limit,
        }
    }
}

/// Trait for places search backends
pub trait PlacesSearch: Send + Sync {
    /// Run one search, returning places in ranked order
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<Vec<Place>>> + Send;
}

/// A single location fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub coordinate: Coordinates,
    /// Horizontal accuracy radius in meters
    pub accuracy_meters: f64,
}

/// Message from a geolocation source to its consumer
#[derive(Debug)]
pub enum LocationEvent {
    Update(LocationUpdate),
    /// Sent at most once per `start`
    Failure(Error),
}

/// Trait for geolocation sources
///
/// `start` and `stop` are idempotent. Events are delivered on the channel
/// handed to `start` until the source is stopped.
pub trait GeolocationSource: Send {
    fn start(&mut self, events: mpsc::Sender<LocationEvent>);

    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Get the default places search backend, configured from `config`
pub fn get_places_search(config: &Config) -> osm::OsmPlaces {
    osm::OsmPlaces::from_config(config)
}

/// Get the IP location service
pub fn get_ip_locator() -> ip_location::IpGeolocation {
    ip_location::IpGeolocation::new()
}
