//! Server shared state
//!
//! Holds configuration and the backends handlers search with.

use crate::config::Config;
use crate::geo::get_places_search;
use crate::geo::ip_location::IpLocator;
use crate::geo::osm::OsmPlaces;
use std::time::Instant;

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Places search backend
    pub places: OsmPlaces,

    /// IP location lookup
    pub locator: IpLocator,

    started: Instant,
}

impl AppState {
    /// Create new application state with backends built from `config`
    pub fn new(config: Config) -> Self {
        let places = get_places_search(&config);
        Self::with_backends(config, places, IpLocator::new())
    }

    /// Create state around explicit backends
    pub fn with_backends(config: Config, places: OsmPlaces, locator: IpLocator) -> Self {
        Self {
            config,
            places,
            locator,
            started: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
