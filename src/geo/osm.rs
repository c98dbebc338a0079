//! Combined OpenStreetMap places backend
//!
//! Text queries go to Nominatim, proximity searches go to Overpass.

use crate::config::Config;
use crate::error::Result;
use crate::geo::nominatim::NominatimSearch;
use crate::geo::overpass::OverpassSearch;
use crate::geo::{PlacesSearch, SearchRequest};
use crate::place::Place;

/// Places search over the public OpenStreetMap services
#[derive(Debug, Clone, Default)]
pub struct OsmPlaces {
    text: NominatimSearch,
    nearby: OverpassSearch,
}

impl OsmPlaces {
    pub fn new(text: NominatimSearch, nearby: OverpassSearch) -> Self {
        Self { text, nearby }
    }

    /// Build both backends from the `[search]` config section
    pub fn from_config(config: &Config) -> Self {
        Self {
            text: NominatimSearch::with_base_url(
                config.search.nominatim_url.clone(),
                &config.search.user_agent,
            ),
            nearby: OverpassSearch::with_url(
                config.search.overpass_url.clone(),
                &config.search.user_agent,
            ),
        }
    }

    pub fn text(&self) -> &NominatimSearch {
        &self.text
    }
}

impl PlacesSearch for OsmPlaces {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>> {
        match request {
            SearchRequest::Text { .. } => self.text.search(request).await,
            SearchRequest::Nearby { .. } => self.nearby.search(request).await,
        }
    }
}
