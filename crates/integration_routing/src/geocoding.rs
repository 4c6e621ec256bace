//! Nominatim geocoding client
//!
//! Converts free-form address strings to places and coordinates back to
//! addresses using the [Nominatim](https://nominatim.openstreetmap.org) API.
//!
//! Implements rate limiting (max 1 request/second per Nominatim usage policy).
//! Memoization is left to the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::RegionBounds;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::models::{Place, PlaceAddress};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Country code filter (e.g., "in" for India)
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// Preferred result language
    #[serde(default = "default_language")]
    pub language: String,

    /// User agent identifying the application (required by the usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between requests in milliseconds (0 disables)
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    5
}

fn default_country_codes() -> String {
    "in".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    "LogiRoute/0.3 (https://github.com/twohreichel/logiroute)".to_string()
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            country_codes: default_country_codes(),
            language: default_language(),
            user_agent: default_user_agent(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// Address could not be resolved
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Rate limit exceeded (max 1 req/sec for Nominatim)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

/// Parameters of a forward search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,
    /// Maximum number of results
    pub limit: u8,
    /// Preferred area; results outside are dropped by the backend when `bounded`
    pub viewbox: Option<RegionBounds>,
    /// Restrict results to the viewbox
    pub bounded: bool,
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Search places matching a free-text query
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>, GeocodingError>;

    /// Find the address at a coordinate
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Place, GeocodingError>;

    /// Check if the geocoding service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Nominatim-based geocoding client with rate limiting
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    last_request: Arc<Mutex<Instant>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let min_interval = Duration::from_millis(config.min_request_interval_ms);

        Ok(Self {
            client,
            config: config.clone(),
            last_request: Arc::new(Mutex::new(
                Instant::now().checked_sub(min_interval).unwrap_or_else(Instant::now),
            )),
        })
    }

    /// Enforce Nominatim's rate limit
    async fn rate_limit(&self) {
        let min_interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < min_interval {
            let wait = min_interval.saturating_sub(elapsed);
            debug!(?wait, "Rate limiting geocoding request");
            tokio::time::sleep(wait).await;
        }
        *last = Instant::now();
    }

    /// Send a GET request and return the body
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<String, GeocodingError> {
        self.rate_limit().await;

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }

        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))
    }

    /// Nominatim `viewbox` value: `west,north,east,south`
    fn viewbox(region: &RegionBounds) -> String {
        format!(
            "{},{},{},{}",
            region.west, region.north, region.east, region.south
        )
    }

    fn parse_search_response(body: &str) -> Result<Vec<Place>, GeocodingError> {
        let raw: Vec<RawPlace> =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        raw.into_iter().map(Self::convert_place).collect()
    }

    fn parse_reverse_response(body: &str, query: &str) -> Result<Place, GeocodingError> {
        let raw: RawReverse =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if let Some(error) = raw.error {
            debug!(%error, "Reverse geocoding returned no address");
            return Err(GeocodingError::AddressNotFound(query.to_string()));
        }

        let place = raw
            .place
            .ok_or_else(|| GeocodingError::AddressNotFound(query.to_string()))?;
        Self::convert_place(place)
    }

    /// Convert a raw place, rejecting unparseable or out-of-range coordinates
    fn convert_place(raw: RawPlace) -> Result<Place, GeocodingError> {
        let latitude: f64 = raw
            .lat
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid latitude: {}", raw.lat)))?;
        let longitude: f64 = raw
            .lon
            .parse()
            .map_err(|_| GeocodingError::ParseError(format!("Invalid longitude: {}", raw.lon)))?;

        if !domain::is_valid_coordinate(latitude, longitude) {
            return Err(GeocodingError::ParseError(format!(
                "Coordinates out of range: {latitude},{longitude}"
            )));
        }

        Ok(Place {
            latitude,
            longitude,
            display_name: raw.display_name.unwrap_or_default(),
            address: convert_address(raw.address.unwrap_or_default()),
            place_id: raw.place_id.unwrap_or_default(),
            importance: raw
                .importance
                .filter(|i| i.is_finite())
                .unwrap_or_default(),
            kind: raw.kind.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self), fields(query = %request.query))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Place>, GeocodingError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(GeocodingError::AddressNotFound(
                "Query must not be empty".to_string(),
            ));
        }

        let url = format!("{}/search", self.config.base_url);
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", request.limit.to_string()),
            ("accept-language", self.config.language.clone()),
        ];

        if !self.config.country_codes.is_empty() {
            params.push(("countrycodes", self.config.country_codes.clone()));
        }

        if let Some(region) = &request.viewbox {
            params.push(("viewbox", Self::viewbox(region)));
            params.push(("bounded", if request.bounded { "1" } else { "0" }.to_string()));
        }

        debug!(%query, limit = request.limit, "Geocoding query");

        let body = self.fetch(&url, &params).await?;
        let places = Self::parse_search_response(&body)?;

        debug!(%query, count = places.len(), "Geocoded query");
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Place, GeocodingError> {
        let url = format!("{}/reverse", self.config.base_url);
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("accept-language", self.config.language.clone()),
        ];

        debug!(%latitude, %longitude, "Reverse geocoding");

        let body = self.fetch(&url, &params).await?;
        Self::parse_reverse_response(&body, &format!("{latitude},{longitude}"))
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/status", self.config.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

fn convert_address(raw: HashMap<String, String>) -> PlaceAddress {
    let get = |key: &str| raw.get(key).cloned();
    PlaceAddress {
        house_number: get("house_number"),
        road: get("road"),
        neighbourhood: get("neighbourhood"),
        suburb: get("suburb"),
        city: get("city").or_else(|| get("town")).or_else(|| get("village")),
        state: get("state"),
        postcode: get("postcode"),
        country: get("country"),
    }
}

/// Raw Nominatim place
#[derive(Debug, Deserialize)]
struct RawPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
    address: Option<HashMap<String, String>>,
    place_id: Option<u64>,
    importance: Option<f64>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Raw reverse response: either a place or `{"error": "..."}`
#[derive(Debug, Deserialize)]
struct RawReverse {
    error: Option<String>,
    #[serde(flatten)]
    place: Option<RawPlace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominatim_config_default() {
        let config = NominatimConfig::default();
        assert_eq!(config.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.country_codes, "in");
        assert_eq!(config.min_request_interval_ms, 1100);
    }

    #[test]
    fn test_nominatim_config_for_testing() {
        let config = NominatimConfig::for_testing();
        assert_eq!(config.min_request_interval_ms, 0);
    }

    #[test]
    fn test_geocoding_error_display() {
        let err = GeocodingError::AddressNotFound("Forum Mall".to_string());
        assert!(err.to_string().contains("Forum Mall"));

        let err = GeocodingError::Timeout;
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_viewbox_order() {
        let viewbox = NominatimGeocodingClient::viewbox(&RegionBounds::bengaluru());
        assert_eq!(viewbox, "77.4272,13.1394,77.7814,12.7342");
    }

    #[test]
    fn test_parse_search_response() {
        let json = r#"[{
            "place_id": 123,
            "lat": "12.9346",
            "lon": "77.6113",
            "display_name": "Forum Mall, Hosur Road, Koramangala, Bengaluru",
            "address": { "road": "Hosur Road", "suburb": "Koramangala", "town": "Bengaluru", "postcode": "560095" },
            "importance": 0.42,
            "type": "mall"
        }]"#;
        let places = NominatimGeocodingClient::parse_search_response(json).unwrap();
        assert_eq!(places.len(), 1);
        let place = &places[0];
        assert!((place.latitude - 12.9346).abs() < f64::EPSILON);
        assert_eq!(place.place_id, 123);
        assert_eq!(place.kind, "mall");
        assert_eq!(place.address.city.as_deref(), Some("Bengaluru"));
        assert_eq!(place.address.postcode.as_deref(), Some("560095"));
    }

    #[test]
    fn test_parse_search_rejects_bad_latitude() {
        let json = r#"[{ "lat": "north", "lon": "77.6" }]"#;
        assert!(NominatimGeocodingClient::parse_search_response(json).is_err());
    }

    #[test]
    fn test_parse_empty_result() {
        let places = NominatimGeocodingClient::parse_search_response("[]").unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_parse_reverse_error_body() {
        let json = r#"{ "error": "Unable to geocode" }"#;
        let result = NominatimGeocodingClient::parse_reverse_response(json, "0,0");
        assert!(matches!(result, Err(GeocodingError::AddressNotFound(_))));
    }

    #[test]
    fn test_parse_reverse_place() {
        let json = r#"{
            "place_id": 9,
            "lat": "12.9716",
            "lon": "77.5946",
            "display_name": "MG Road, Bengaluru",
            "address": { "road": "MG Road", "city": "Bengaluru" }
        }"#;
        let place = NominatimGeocodingClient::parse_reverse_response(json, "12.9716,77.5946").unwrap();
        assert_eq!(place.display_name, "MG Road, Bengaluru");
        assert_eq!(place.address.road.as_deref(), Some("MG Road"));
    }
}
