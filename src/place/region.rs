//! Map regions and distances
//!
//! A region is a center plus a latitude/longitude span in degrees, the shape
//! used both for camera moves and for biasing searches.

use crate::constants::geo::{EARTH_RADIUS_METERS, METERS_PER_DEGREE_LAT};
use crate::place::Coordinates;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A rectangular region of the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinates,
    /// North-south span in degrees
    pub lat_delta: f64,
    /// East-west span in degrees
    pub lng_delta: f64,
}

impl Region {
    /// Region spanning `lat_delta` by `lng_delta` degrees around `center`
    pub fn with_span(center: Coordinates, lat_delta: f64, lng_delta: f64) -> Self {
        Self {
            center,
            lat_delta: lat_delta.abs(),
            lng_delta: lng_delta.abs(),
        }
    }

    /// Square region `meters` on a side, centered on `center`
    ///
    /// Longitude degrees per meter vary with latitude, so the east-west span
    /// is scaled by cos(lat). Near the poles the span is capped at 360 degrees.
    pub fn around(center: Coordinates, meters: f64) -> Self {
        let lat_delta = meters / METERS_PER_DEGREE_LAT;
        let meters_per_deg_lng = METERS_PER_DEGREE_LAT * (center.lat * PI / 180.0).cos();
        let lng_delta = if meters_per_deg_lng > f64::EPSILON {
            (meters / meters_per_deg_lng).min(360.0)
        } else {
            360.0
        };
        Self::with_span(center, lat_delta, lng_delta)
    }

    /// Half of the north-south extent, in meters
    pub fn radius_meters(&self) -> f64 {
        self.lat_delta * METERS_PER_DEGREE_LAT / 2.0
    }

    /// Bounding box as `(south, west, north, east)`, clamped to valid ranges
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        let half_lat = self.lat_delta / 2.0;
        let half_lng = self.lng_delta / 2.0;
        (
            (self.center.lat - half_lat).max(-90.0),
            (self.center.lng - half_lng).max(-180.0),
            (self.center.lat + half_lat).min(90.0),
            (self.center.lng + half_lng).min(180.0),
        )
    }

    /// Whether a coordinate falls inside the (clamped) bounding box
    pub fn contains(&self, coord: Coordinates) -> bool {
        let (south, west, north, east) = self.bounding_box();
        (south..=north).contains(&coord.lat) && (west..=east).contains(&coord.lng)
    }
}

/// Calculate the distance between two points in meters (Haversine formula)
pub fn haversine_distance(p1: Coordinates, p2: Coordinates) -> f64 {
    let lat1 = p1.lat * PI / 180.0;
    let lat2 = p2.lat * PI / 180.0;
    let delta_lat = (p2.lat - p1.lat) * PI / 180.0;
    let delta_lng = (p2.lng - p1.lng) * PI / 180.0;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_around_at_equator() {
        let region = Region::around(Coordinates::new(0.0, 0.0), 1000.0);
        assert_relative_eq!(region.lat_delta, 1000.0 / 111_320.0, epsilon = 1e-9);
        assert_relative_eq!(region.lng_delta, region.lat_delta, epsilon = 1e-9);
        assert_relative_eq!(region.radius_meters(), 500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_around_widens_longitude_away_from_equator() {
        let region = Region::around(Coordinates::new(60.0, 10.0), 1000.0);
        // cos(60deg) = 0.5, so twice as many degrees of longitude
        assert_relative_eq!(region.lng_delta, 2.0 * region.lat_delta, epsilon = 1e-9);
    }

    #[test]
    fn test_around_at_pole_is_capped() {
        let region = Region::around(Coordinates::new(90.0, 0.0), 1000.0);
        assert!(region.lng_delta <= 360.0);
    }

    #[test]
    fn test_bounding_box_and_contains() {
        let center = Coordinates::new(40.0, -74.0);
        let region = Region::with_span(center, 2.0, 2.0);
        let (south, west, north, east) = region.bounding_box();
        assert_relative_eq!(south, 39.0);
        assert_relative_eq!(west, -75.0);
        assert_relative_eq!(north, 41.0);
        assert_relative_eq!(east, -73.0);

        assert!(region.contains(center));
        assert!(region.contains(Coordinates::new(40.9, -73.1)));
        assert!(!region.contains(Coordinates::new(41.5, -74.0)));
    }

    #[test]
    fn test_bounding_box_is_clamped() {
        let region = Region::with_span(Coordinates::new(89.5, 179.5), 2.0, 2.0);
        let (_, _, north, east) = region.bounding_box();
        assert_relative_eq!(north, 90.0);
        assert_relative_eq!(east, 180.0);
    }

    #[test]
    fn test_haversine_distance() {
        // NYC to a point one degree north (about 111 km)
        let nyc = Coordinates::new(40.7128, -74.0060);
        let north = Coordinates::new(41.7128, -74.0060);
        let distance = haversine_distance(nyc, north);
        assert!(
            (distance - 111_000.0).abs() < 1000.0,
            "Distance {} should be approximately 111000",
            distance
        );
        assert_relative_eq!(haversine_distance(nyc, nyc), 0.0);
    }
}
