//! Places and coordinates
//!
//! This module handles:
//! - Validated geographic coordinates
//! - Place identity (equality is by identity only)
//! - Address summaries and map annotations
//! - Regions and distances

pub mod region;

pub use region::{haversine_distance, Region};

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(crate::error::Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }
}

/// Opaque place identity
///
/// Provider-backed places carry the provider's stable id (e.g. `node/123`),
/// so the same real-world place found by two different searches compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh id for a place with no provider identity
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Structured address parts used to build a one-line summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
}

impl Address {
    /// Render as `"<road> <house number>, <locality>"`, dropping empty parts
    pub fn summary(&self) -> String {
        let street = [self.road.as_deref(), self.house_number.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [Some(street.as_str()), self.locality.as_deref().map(str::trim)]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A candidate point of interest
///
/// Two places are the same entity iff their ids match; name, coordinate and
/// address are ignored by `PartialEq` and `Hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    pub coordinate: Coordinates,
    /// Formatted address summary
    pub address: String,
}

impl Place {
    pub fn new(
        id: impl Into<PlaceId>,
        name: impl Into<String>,
        coordinate: Coordinates,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            address: address.into(),
        }
    }

    /// Display title: the name, or the address for unnamed places
    pub fn title(&self) -> &str {
        if self.name.is_empty() {
            &self.address
        } else {
            &self.name
        }
    }

    /// Map pin for this place
    pub fn annotation(&self) -> Annotation {
        if self.name.is_empty() {
            Annotation {
                coordinate: self.coordinate,
                title: self.address.clone(),
                subtitle: None,
            }
        } else {
            Annotation {
                coordinate: self.coordinate,
                title: self.name.clone(),
                subtitle: Some(self.address.clone()),
            }
        }
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A map pin marking the current selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub coordinate: Coordinates,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}
