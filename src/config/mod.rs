//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/place-picker/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Picker behaviour
    #[serde(default)]
    pub picker: PickerConfig,

    /// Search backends
    #[serde(default)]
    pub search: SearchConfig,

    /// Location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map URL settings
    #[serde(default)]
    pub url: UrlConfig,
}

/// Picker behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Maximum number of places kept in the result list
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Nearby-search and camera region size in meters
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_meters: f64,

    /// Location updates more accurate than this stop the location source
    #[serde(default = "default_desired_accuracy")]
    pub desired_accuracy_meters: f64,

    /// Queries shorter than this are not searched
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Span in degrees of the region text searches are biased to
    #[serde(default = "default_query_span")]
    pub query_span_degrees: f64,
}

/// Search backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// User-Agent sent to OpenStreetMap services
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Places requested per nearby search
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,

    /// Places requested per text search
    #[serde(default = "default_query_limit")]
    pub query_limit: usize,
}

/// Location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, --here is default when no location given
    #[serde(default)]
    pub default_here: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format for a confirmed pick
    #[serde(default = "default_format")]
    pub format: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Map URL settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: BTreeMap<String, String>,
}

// Default value functions for serde
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_nearby_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS
}
fn default_desired_accuracy() -> f64 {
    DEFAULT_DESIRED_ACCURACY
}
fn default_min_query_len() -> usize {
    DEFAULT_MIN_QUERY_LEN
}
fn default_query_span() -> f64 {
    DEFAULT_QUERY_SPAN
}
fn default_nominatim_url() -> String {
    DEFAULT_NOMINATIM_URL.to_string()
}
fn default_overpass_url() -> String {
    DEFAULT_OVERPASS_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_nearby_limit() -> usize {
    DEFAULT_NEARBY_LIMIT
}
fn default_query_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> BTreeMap<String, String> {
    let mut providers = BTreeMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/search/?api=1&query={lat},{lng}".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=18/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&q={name}".to_string(),
    );
    providers
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            nearby_radius_meters: default_nearby_radius(),
            desired_accuracy_meters: default_desired_accuracy(),
            min_query_len: default_min_query_len(),
            query_span_degrees: default_query_span(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            nominatim_url: default_nominatim_url(),
            overpass_url: default_overpass_url(),
            user_agent: default_user_agent(),
            nearby_limit: default_nearby_limit(),
            query_limit: default_query_limit(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            let config: Config = toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["picker", "max_results"] => Some(self.picker.max_results.to_string()),
            ["picker", "nearby_radius_meters"] => {
                Some(self.picker.nearby_radius_meters.to_string())
            }
            ["picker", "desired_accuracy_meters"] => {
                Some(self.picker.desired_accuracy_meters.to_string())
            }
            ["picker", "min_query_len"] => Some(self.picker.min_query_len.to_string()),
            ["picker", "query_span_degrees"] => Some(self.picker.query_span_degrees.to_string()),

            ["search", "nominatim_url"] => Some(self.search.nominatim_url.clone()),
            ["search", "overpass_url"] => Some(self.search.overpass_url.clone()),
            ["search", "user_agent"] => Some(self.search.user_agent.clone()),
            ["search", "nearby_limit"] => Some(self.search.nearby_limit.to_string()),
            ["search", "query_limit"] => Some(self.search.query_limit.to_string()),

            ["location", "default_here"] => Some(self.location.default_here.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong, leaving the
    /// config unchanged
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        updated.apply(key, value)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["picker", "max_results"] => self.picker.max_results = parse_value(key, value)?,
            ["picker", "nearby_radius_meters"] => {
                self.picker.nearby_radius_meters = parse_value(key, value)?
            }
            ["picker", "desired_accuracy_meters"] => {
                self.picker.desired_accuracy_meters = parse_value(key, value)?
            }
            ["picker", "min_query_len"] => self.picker.min_query_len = parse_value(key, value)?,
            ["picker", "query_span_degrees"] => {
                self.picker.query_span_degrees = parse_value(key, value)?
            }

            ["search", "nominatim_url"] => self.search.nominatim_url = value.to_string(),
            ["search", "overpass_url"] => self.search.overpass_url = value.to_string(),
            ["search", "user_agent"] => self.search.user_agent = value.to_string(),
            ["search", "nearby_limit"] => self.search.nearby_limit = parse_value(key, value)?,
            ["search", "query_limit"] => self.search.query_limit = parse_value(key, value)?,

            ["location", "default_here"] => {
                self.location.default_here = parse_value(key, value)?
            }

            ["output", "format"] => self.output.format = value.to_string(),

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["url", "default"] => self.url.default = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// Check values the picker and formatters cannot work with
    pub fn validate(&self) -> Result<()> {
        let picker = &self.picker;
        if picker.max_results == 0 {
            return Err(Error::Config("picker.max_results must be at least 1".to_string()));
        }
        for (key, value) in [
            ("picker.nearby_radius_meters", picker.nearby_radius_meters),
            ("picker.desired_accuracy_meters", picker.desired_accuracy_meters),
            ("picker.query_span_degrees", picker.query_span_degrees),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive: {}", key, value)));
            }
        }
        if crate::format::get_formatter(&self.output.format).is_none() {
            return Err(Error::Config(format!(
                "Unknown output format: {}",
                self.output.format
            )));
        }
        if !self.url.providers.contains_key(&self.url.default) {
            return Err(Error::Config(format!(
                "Unknown URL provider: {}",
                self.url.default
            )));
        }
        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "picker.max_results",
            "picker.nearby_radius_meters",
            "picker.desired_accuracy_meters",
            "picker.min_query_len",
            "picker.query_span_degrees",
            "search.nominatim_url",
            "search.overpass_url",
            "search.user_agent",
            "search.nearby_limit",
            "search.query_limit",
            "location.default_here",
            "output.format",
            "server.host",
            "server.port",
            "url.default",
        ]
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {name} placeholders
    pub fn format_url(
        &self,
        provider: Option<&str>,
        lat: f64,
        lng: f64,
        name: &str,
    ) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self
            .url
            .providers
            .get(provider_name)
            .ok_or_else(|| Error::Config(format!("Unknown URL provider: {}", provider_name)))?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string())
            .replace("{name}", &urlencoding::encode(name)))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.picker.max_results, 50);
        assert_eq!(config.picker.nearby_radius_meters, 1000.0);
        assert_eq!(config.picker.desired_accuracy_meters, 100.0);
        assert_eq!(config.picker.min_query_len, 2);
        assert_eq!(config.server.port, 7879);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("picker.max_results"), Some("50".to_string()));

        config.set("picker.max_results", "20").unwrap();
        assert_eq!(config.picker.max_results, 20);

        config.set("search.user_agent", "my-app/1.0").unwrap();
        assert_eq!(config.get("search.user_agent"), Some("my-app/1.0".to_string()));

        config.set("location.default_here", "true").unwrap();
        assert!(config.location.default_here);
    }

    #[test]
    fn test_get_invalid_key() {
        let config = Config::default();
        assert_eq!(config.get("invalid.key"), None);
        assert_eq!(config.get("picker"), None);
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("picker.nearby_radius_meters", "wide").is_err());
        assert!(config.set("server.port", "99999").is_err());
    }

    #[test]
    fn test_set_rejects_unusable_values() {
        let mut config = Config::default();

        assert!(config.set("picker.max_results", "0").is_err());
        assert!(config.set("picker.nearby_radius_meters", "-10").is_err());
        assert!(config.set("output.format", "csv").is_err());
        assert!(config.set("url.default", "nowhere").is_err());

        // Rejected values leave the config as it was
        assert_eq!(config.picker.max_results, 50);
        assert_eq!(config.output.format, "text");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[output]\nformat = \"csv\"\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "key {} not readable", key);
        }
    }

    #[test]
    fn test_format_url() {
        let config = Config::default();

        let url = config
            .format_url(Some("google"), 40.7128, -74.0060, "")
            .unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=40.7128,-74.006"
        );

        let url = config
            .format_url(Some("apple"), 1.5, 2.5, "Cafe Central")
            .unwrap();
        assert_eq!(url, "https://maps.apple.com/?ll=1.5,2.5&q=Cafe%20Central");
    }

    #[test]
    fn test_format_url_default_provider() {
        let config = Config::default();
        let url = config.format_url(None, 40.7128, -74.0060, "").unwrap();
        assert!(url.contains("openstreetmap.org"));
    }

    #[test]
    fn test_format_url_unknown_provider() {
        let config = Config::default();
        assert!(config.format_url(Some("unknown"), 0.0, 0.0, "").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.picker.max_results = 7;
        config.search.query_limit = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.picker.max_results, 7);
        assert_eq!(loaded.search.query_limit, 3);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.picker.max_results, 50);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[picker]\nmax_results = 5\n").unwrap();
        assert_eq!(config.picker.max_results, 5);
        assert_eq!(config.picker.min_query_len, 2);
        assert_eq!(config.search.nearby_limit, 25);
    }

    #[test]
    fn test_serialization_format() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        assert!(toml.contains("[picker]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[url.providers]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:7879");
    }
}
