//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::api;
use crate::constants::picker;

/// Default upper bound on the result list
pub const DEFAULT_MAX_RESULTS: usize = picker::MAX_RESULTS;

/// Default nearby-search region size in meters
pub const DEFAULT_NEARBY_RADIUS: f64 = picker::NEARBY_RADIUS_METERS;

/// Default accuracy at which location updates stop
pub const DEFAULT_DESIRED_ACCURACY: f64 = picker::DESIRED_ACCURACY_METERS;

/// Default minimum query length
pub const DEFAULT_MIN_QUERY_LEN: usize = picker::MIN_QUERY_LEN;

/// Default text-search region span in degrees
pub const DEFAULT_QUERY_SPAN: f64 = picker::QUERY_SPAN_DEGREES;

/// Default Nominatim base URL
pub const DEFAULT_NOMINATIM_URL: &str = api::NOMINATIM_URL;

/// Default Overpass interpreter URL
pub const DEFAULT_OVERPASS_URL: &str = api::OVERPASS_URL;

/// Default User-Agent for OpenStreetMap services
pub const DEFAULT_USER_AGENT: &str = api::USER_AGENT;

/// Default number of nearby places requested
pub const DEFAULT_NEARBY_LIMIT: usize = 25;

/// Default number of text-search results requested
pub const DEFAULT_QUERY_LIMIT: usize = 10;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7879;

/// Default URL provider
pub const DEFAULT_URL_PROVIDER: &str = "openstreetmap";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "place-picker";
