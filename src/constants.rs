//! Centralized constants for the place-picker crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in meters (WGS84 approximation)
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

    /// Meters per degree of latitude (approximate, varies slightly with latitude)
    pub const METERS_PER_DEGREE_LAT: f64 = 111_320.0;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// Overpass API (OpenStreetMap points of interest)
    pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// User-Agent sent to OpenStreetMap services (required by their usage policy)
    pub const USER_AGENT: &str = concat!("place-picker/", env!("CARGO_PKG_VERSION"));
}

/// Cache settings
pub mod cache {
    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}

/// Location picker tuning
pub mod picker {
    /// Side length of the nearby-search region and of the camera region
    /// around a selection, in meters
    pub const NEARBY_RADIUS_METERS: f64 = 1000.0;

    /// Location updates more accurate than this stop the source
    pub const DESIRED_ACCURACY_METERS: f64 = 100.0;

    /// Text queries shorter than this (after trimming) are not searched
    pub const MIN_QUERY_LEN: usize = 2;

    /// Span in degrees of the region a text search is biased to
    pub const QUERY_SPAN_DEGREES: f64 = 2.0;

    /// Upper bound on the result list length
    pub const MAX_RESULTS: usize = 50;

    /// Accuracy reported for IP-derived locations, in meters
    pub const IP_ACCURACY_METERS: f64 = 5000.0;
}
