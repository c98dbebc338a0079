//! IP-based geolocation
//!
//! Resolves a coarse location from the public IP address via ip-api.com.
//! Lookups are cached on disk for an hour, since the answer rarely changes
//! within a session and the service is rate limited.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::constants::picker::IP_ACCURACY_METERS;
use crate::error::{Error, Result};
use crate::geo::{GeolocationSource, LocationEvent, LocationUpdate};
use crate::place::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A location resolved from the public IP address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    pub coordinate: Coordinates,
    /// "City, Region, Country"
    pub display_name: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<IpLocation> {
        if self.status != "success" {
            return Err(Error::LocationUnavailable(format!(
                "IP lookup failed: {}",
                self.message.as_deref().unwrap_or("no reason given")
            )));
        }

        let (Some(lat), Some(lon)) = (self.lat, self.lon) else {
            return Err(Error::LocationUnavailable(
                "IP lookup returned no coordinates".to_string(),
            ));
        };

        let parts: Vec<String> = [self.city, self.region_name, self.country]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();

        Ok(IpLocation {
            coordinate: Coordinates::new(lat, lon),
            display_name: if parts.is_empty() {
                "Unknown Location".to_string()
            } else {
                parts.join(", ")
            },
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    location: IpLocation,
    cached_at: DateTime<Utc>,
}

/// A single cached IP location with an expiry
#[derive(Debug, Clone)]
struct LocationCache {
    path: PathBuf,
    ttl: Duration,
}

impl LocationCache {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            ttl: Duration::from_secs(IP_LOCATION_TTL_SECS),
        }
    }

    /// The cached location, unless missing, unreadable or expired
    fn get(&self) -> Option<IpLocation> {
        let content = fs::read_to_string(&self.path).ok()?;
        let entry: CacheEntry = serde_json::from_str(&content).ok()?;

        let age = Utc::now().signed_duration_since(entry.cached_at).to_std().ok()?;
        (age < self.ttl).then_some(entry.location)
    }

    fn put(&self, location: &IpLocation) {
        let entry = CacheEntry {
            location: location.clone(),
            cached_at: Utc::now(),
        };

        let written = self
            .path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(Error::from)
            .and_then(|_| Ok(serde_json::to_string_pretty(&entry)?))
            .and_then(|json| Ok(fs::write(&self.path, json)?));

        if let Err(e) = written {
            debug!(path = %self.path.display(), "could not write IP location cache: {}", e);
        }
    }

    fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

/// IP location lookup with caching
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    api_url: String,
    cache: Option<LocationCache>,
}

impl IpLocator {
    /// Create an IP locator caching under the user cache directory
    pub fn new() -> Self {
        let cache = dirs::cache_dir()
            .map(|dir| {
                dir.join(crate::config::defaults::APP_DIR_NAME)
                    .join(IP_LOCATION_CACHE_FILE)
            })
            .map(LocationCache::new);

        Self {
            cache,
            ..Self::without_cache()
        }
    }

    /// Create an IP locator caching at `cache_path`
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache: Some(LocationCache::new(cache_path)),
            ..Self::without_cache()
        }
    }

    /// Create an IP locator that always asks the service
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: IP_API_URL.to_string(),
            cache: None,
        }
    }

    /// Point the locator at a different lookup endpoint
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Keep cached lookups for `ttl` instead of the default hour
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        if let Some(cache) = self.cache.as_mut() {
            cache.ttl = ttl;
        }
        self
    }

    /// Where lookups are cached, if anywhere
    pub fn cache_path(&self) -> Option<&Path> {
        self.cache.as_ref().map(|c| c.path.as_path())
    }

    /// Resolve the current location, from cache when fresh
    pub async fn locate(&self) -> Result<IpLocation> {
        if let Some(location) = self.cache.as_ref().and_then(LocationCache::get) {
            debug!("using cached IP location");
            return Ok(location);
        }

        let location = self.lookup().await?;
        if let Some(cache) = &self.cache {
            cache.put(&location);
        }
        Ok(location)
    }

    async fn lookup(&self) -> Result<IpLocation> {
        let response = self
            .client
            .get(&self.api_url)
            .send()
            .await
            .map_err(|e| Error::LocationUnavailable(format!("IP location request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::LocationUnavailable(format!(
                "IP location service returned {}",
                status
            )));
        }

        let body: IpApiResponse = response.json().await.map_err(|e| {
            Error::LocationUnavailable(format!("Unreadable IP location response: {}", e))
        })?;

        body.into_location()
    }

    /// Forget any cached location
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Geolocation source backed by a one-shot IP lookup
///
/// Each `start` performs one lookup on a background task and reports either
/// a coarse-accuracy update or a `LocationUnavailable` failure.
#[derive(Debug)]
pub struct IpGeolocation {
    locator: IpLocator,
    task: Option<JoinHandle<()>>,
}

impl IpGeolocation {
    pub fn new() -> Self {
        Self::with_locator(IpLocator::new())
    }

    pub fn with_locator(locator: IpLocator) -> Self {
        Self {
            locator,
            task: None,
        }
    }

    pub fn locator(&self) -> &IpLocator {
        &self.locator
    }
}

impl Default for IpGeolocation {
    fn default() -> Self {
        Self::new()
    }
}

impl GeolocationSource for IpGeolocation {
    fn start(&mut self, events: mpsc::Sender<LocationEvent>) {
        if self.is_running() {
            return;
        }

        let locator = self.locator.clone();
        self.task = Some(tokio::spawn(async move {
            let event = match locator.locate().await {
                Ok(location) => {
                    debug!(name = %location.display_name, "IP location resolved");
                    LocationEvent::Update(LocationUpdate {
                        coordinate: location.coordinate,
                        accuracy_meters: IP_ACCURACY_METERS,
                    })
                }
                Err(e) => {
                    warn!("IP location failed: {}", e);
                    LocationEvent::Failure(e)
                }
            };
            let _ = events.send(event).await;
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IpGeolocation {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn nyc() -> IpLocation {
        IpLocation {
            coordinate: Coordinates::new(40.7128, -74.0060),
            display_name: "New York".to_string(),
        }
    }

    #[test]
    fn test_without_cache_has_no_path() {
        assert!(IpLocator::without_cache().cache_path().is_none());
    }

    #[test]
    fn test_cache_round_trip_and_clear() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("ip.json");
        let locator = IpLocator::with_cache_path(path.clone());
        let cache = locator.cache.clone().unwrap();

        assert!(cache.get().is_none());

        cache.put(&nyc());
        assert!(path.exists());
        assert_eq!(cache.get(), Some(nyc()));

        locator.clear_cache();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_expired_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stale.json");
        let stale = CacheEntry {
            location: nyc(),
            cached_at: Utc::now() - chrono::Duration::hours(2),
        };
        fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        let locator = IpLocator::with_cache_path(path);
        assert!(locator.cache.as_ref().unwrap().get().is_none());

        let patient = locator.with_cache_ttl(Duration::from_secs(3 * 3600));
        assert_eq!(patient.cache.as_ref().unwrap().get(), Some(nyc()));
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ip.json");
        fs::write(&path, "not json").unwrap();

        let locator = IpLocator::with_cache_path(path);
        assert!(locator.cache.as_ref().unwrap().get().is_none());
    }

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success", "lat": 48.85, "lon": 2.35,
                "city": "Paris", "country": "France"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let temp_dir = TempDir::new().unwrap();
        let locator = IpLocator::with_cache_path(temp_dir.path().join("ip.json"))
            .with_api_url(server.uri());

        let first = locator.locate().await.unwrap();
        let second = locator.locate().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.display_name, "Paris, France");
    }

    #[tokio::test]
    async fn test_locate_from_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success", "lat": 52.52, "lon": 13.405,
                "city": "Berlin", "regionName": "Berlin", "country": "Germany"
            })))
            .mount(&server)
            .await;

        let locator = IpLocator::without_cache().with_api_url(server.uri());
        let location = locator.locate().await.unwrap();
        assert_eq!(location.coordinate, Coordinates::new(52.52, 13.405));
        assert_eq!(location.display_name, "Berlin, Berlin, Germany");
    }

    #[tokio::test]
    async fn test_locate_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "fail"})))
            .mount(&server)
            .await;

        let locator = IpLocator::without_cache().with_api_url(server.uri());
        let err = locator.locate().await.unwrap_err();
        assert!(matches!(err, Error::LocationUnavailable(_)));
    }

    #[tokio::test]
    async fn test_source_reports_cached_location() {
        let temp_dir = TempDir::new().unwrap();
        let locator = IpLocator::with_cache_path(temp_dir.path().join("cache.json"))
            .with_api_url("http://127.0.0.1:9");
        locator.cache.as_ref().unwrap().put(&nyc());

        let (tx, mut rx) = mpsc::channel(4);
        let mut source = IpGeolocation::with_locator(locator);
        source.start(tx);

        match rx.recv().await {
            Some(LocationEvent::Update(update)) => {
                assert_eq!(update.coordinate, nyc().coordinate);
                assert_eq!(update.accuracy_meters, IP_ACCURACY_METERS);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        source.stop();
        assert!(!source.is_running());
    }

    #[tokio::test]
    async fn test_source_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let locator = IpLocator::without_cache().with_api_url(server.uri());
        let (tx, mut rx) = mpsc::channel(4);
        let mut source = IpGeolocation::with_locator(locator);
        source.start(tx);

        assert!(matches!(
            rx.recv().await,
            Some(LocationEvent::Failure(Error::LocationUnavailable(_)))
        ));
    }
}
