//! Geocode service
//!
//! Forward and reverse address resolution with memoization, free-text input
//! classification and search-as-you-type suggestions. Lookups never fail:
//! backend errors are logged and answered with an empty or absent result.
//! Only successful lookups are cached, so a recovered backend is used on the
//! next call.

use std::{fmt, sync::Arc};

use domain::{GeoPoint, GeocodeOptions, GeocodeResult, RegionBounds, ReverseGeocodeResult};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::ports::{GeocodeQuery, GeocodingPort};

/// Tunables of the geocode service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeServiceConfig {
    /// Operating region used for bounded searches and region checks
    pub region: RegionBounds,
    /// Maximum number of entries per cache
    pub max_capacity: u64,
    /// Result limit of plain searches
    pub default_limit: u8,
    /// Result limit of postal code suggestions
    pub postal_code_limit: u8,
    /// Result limit of address suggestions
    pub address_limit: u8,
    /// Inputs shorter than this produce no suggestions
    pub min_query_len: usize,
}

impl Default for GeocodeServiceConfig {
    fn default() -> Self {
        Self {
            region: RegionBounds::default(),
            max_capacity: 10_000,
            default_limit: 5,
            postal_code_limit: 5,
            address_limit: 8,
            min_query_len: 3,
        }
    }
}

/// Classification of free-text location input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParsedInput {
    /// A `lat, lng` pair within valid ranges
    Coordinates(GeoPoint),
    /// A six-digit postal code
    PostalCode(String),
    /// Anything else
    Address(String),
}

/// Classify free-text input
///
/// Two decimal numbers separated by commas and/or whitespace are read as
/// latitude then longitude, provided both are in range. Exactly six ASCII
/// digits form a postal code. All other input is an address.
#[must_use]
pub fn parse_input(text: &str) -> ParsedInput {
    let text = text.trim();
    if let Some(point) = parse_coordinates(text) {
        return ParsedInput::Coordinates(point);
    }
    if text.len() == 6 && text.bytes().all(|b| b.is_ascii_digit()) {
        return ParsedInput::PostalCode(text.to_string());
    }
    ParsedInput::Address(text.to_string())
}

fn parse_coordinates(text: &str) -> Option<GeoPoint> {
    let parts: Vec<&str> = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    let [lat, lng] = parts.as_slice() else {
        return None;
    };
    if !is_decimal(lat) || !is_decimal(lng) {
        return None;
    }
    GeoPoint::new(lat.parse().ok()?, lng.parse().ok()?).ok()
}

/// `-?digits(.digits)?`, with an optional trailing dot
fn is_decimal(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.bytes().all(|b| b.is_ascii_digit())
}

/// Reverse lookup cache key: coordinate in micro-degrees
fn reverse_key(point: GeoPoint) -> (i64, i64) {
    (
        (point.lat() * 1e6).round() as i64,
        (point.lng() * 1e6).round() as i64,
    )
}

/// Geocode service with bounded memoization
pub struct GeocodeService {
    geocoding_port: Arc<dyn GeocodingPort>,
    config: GeocodeServiceConfig,
    forward_cache: Cache<(String, GeocodeOptions), Vec<GeocodeResult>>,
    reverse_cache: Cache<(i64, i64), ReverseGeocodeResult>,
}

impl fmt::Debug for GeocodeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodeService")
            .field("config", &self.config)
            .field("forward_entries", &self.forward_cache.entry_count())
            .field("reverse_entries", &self.reverse_cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl GeocodeService {
    /// Create a new geocode service with empty caches
    pub fn new(geocoding_port: Arc<dyn GeocodingPort>, config: GeocodeServiceConfig) -> Self {
        Self {
            geocoding_port,
            forward_cache: Cache::builder().max_capacity(config.max_capacity).build(),
            reverse_cache: Cache::builder().max_capacity(config.max_capacity).build(),
            config,
        }
    }

    /// Options of a plain region-bounded search
    #[must_use]
    pub fn default_options(&self) -> GeocodeOptions {
        GeocodeOptions::default().with_limit(self.config.default_limit)
    }

    /// The configured operating region
    #[must_use]
    pub const fn region(&self) -> &RegionBounds {
        &self.config.region
    }

    /// Resolve free text into places
    ///
    /// Bounded searches only return places inside the operating region, even
    /// when the backend answers with matches outside it.
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str, options: GeocodeOptions) -> Vec<GeocodeResult> {
        let text = query.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let key = (text.to_string(), options);
        if let Some(results) = self.forward_cache.get(&key).await {
            debug!(results = results.len(), "Geocode cache hit");
            return results;
        }

        let request = GeocodeQuery {
            text: text.to_string(),
            limit: options.limit,
            viewbox: Some(self.config.region),
            bounded: options.bounded,
        };

        match self.geocoding_port.search(&request).await {
            Ok(results) => {
                let results: Vec<GeocodeResult> = if options.bounded {
                    results
                        .into_iter()
                        .filter(|r| self.is_within_region(r.lat, r.lng))
                        .collect()
                } else {
                    results
                };
                debug!(results = results.len(), "Geocode resolved");
                self.forward_cache.insert(key, results.clone()).await;
                results
            },
            Err(e) => {
                warn!(error = %e, "Geocoding failed");
                Vec::new()
            },
        }
    }

    /// Resolve a coordinate into an address
    ///
    /// Returns `None` for invalid coordinates and on backend failure.
    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, lat: f64, lng: f64) -> Option<ReverseGeocodeResult> {
        let Ok(point) = GeoPoint::new(lat, lng) else {
            warn!(lat, lng, "Reverse geocoding skipped for invalid coordinates");
            return None;
        };

        let key = reverse_key(point);
        if let Some(result) = self.reverse_cache.get(&key).await {
            debug!("Reverse geocode cache hit");
            return Some(result);
        }

        match self.geocoding_port.reverse(point).await {
            Ok(result) => {
                self.reverse_cache.insert(key, result.clone()).await;
                Some(result)
            },
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                None
            },
        }
    }

    /// Inclusive bounding-box test against the operating region
    #[must_use]
    pub fn is_within_region(&self, lat: f64, lng: f64) -> bool {
        self.config.region.contains(lat, lng)
    }

    /// Suggestions for partially typed input
    ///
    /// Coordinates are reverse geocoded into a single result that keeps the
    /// typed position; postal codes and addresses are searched with their own
    /// result limits.
    #[instrument(skip(self))]
    pub async fn get_suggestions(&self, text: &str) -> Vec<GeocodeResult> {
        let text = text.trim();
        if text.chars().count() < self.config.min_query_len {
            return Vec::new();
        }

        match parse_input(text) {
            ParsedInput::Coordinates(point) => {
                let (display_name, address) = self
                    .reverse_geocode(point.lat(), point.lng())
                    .await
                    .map_or_else(
                        || (point.to_string(), domain::Address::default()),
                        |r| (r.display_name, r.address),
                    );
                vec![GeocodeResult {
                    lat: point.lat(),
                    lng: point.lng(),
                    display_name,
                    address,
                    place_id: 0,
                    importance: 1.0,
                    category: "coordinates".to_string(),
                }]
            },
            ParsedInput::PostalCode(code) => {
                self.geocode(
                    &code,
                    GeocodeOptions::default().with_limit(self.config.postal_code_limit),
                )
                .await
            },
            ParsedInput::Address(address) => {
                self.geocode(
                    &address,
                    GeocodeOptions::default().with_limit(self.config.address_limit),
                )
                .await
            },
        }
    }

    /// Check if the geocoding backend is reachable
    pub async fn is_available(&self) -> bool {
        self.geocoding_port.is_available().await
    }
}
