//! Directions client for OpenRouteService-compatible backends
//!
//! Requests a road route between two points for a vehicle profile using
//! `GET {base_url}/v2/directions/{profile}`.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoPoint, RoutePreference, TransportMode};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::RoutingConfig;
use crate::error::RoutingError;
use crate::models::{Directions, DirectionsSegment, DirectionsStep};

/// Trait for directions clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Fetch the first candidate route between two points
    async fn get_directions(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TransportMode,
        preference: RoutePreference,
    ) -> Result<Directions, RoutingError>;

    /// Check if the routing service is reachable
    async fn is_healthy(&self) -> bool;
}

/// Backend profile name for a vehicle class
#[must_use]
pub const fn backend_profile(mode: TransportMode) -> &'static str {
    match mode {
        TransportMode::HeavyGoodsVehicle => "driving-hgv",
        TransportMode::LightCommercialVehicle => "driving-car",
        TransportMode::Bicycle => "cycling-regular",
        TransportMode::WalkingDelivery => "foot-walking",
    }
}

/// OpenRouteService directions client
#[derive(Debug)]
pub struct OpenRouteServiceClient {
    client: Client,
    config: RoutingConfig,
}

impl OpenRouteServiceClient {
    /// Create a new directions client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &RoutingConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("LogiRoute/0.3")
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Parse and validate a directions response body
    ///
    /// Only the first candidate route is kept.
    fn parse_directions_response(
        body: &str,
        start: GeoPoint,
        end: GeoPoint,
    ) -> Result<Directions, RoutingError> {
        let raw: RawDirectionsResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let Some(route) = raw.routes.into_iter().next() else {
            return Err(RoutingError::NoRouteFound {
                from: start.to_lng_lat(),
                to: end.to_lng_lat(),
            });
        };

        Self::convert_route(route)
    }

    /// Convert a raw route into validated directions
    fn convert_route(raw: RawRoute) -> Result<Directions, RoutingError> {
        let distance_meters = non_negative(raw.summary.distance, "summary.distance")?;
        let duration_seconds = non_negative(raw.summary.duration, "summary.duration")?;

        let coordinates = raw
            .geometry
            .coordinates
            .iter()
            .map(|pair| Self::convert_coordinate(pair))
            .collect::<Result<Vec<_>, _>>()?;

        if coordinates.len() < 2 {
            return Err(RoutingError::InvalidResponse(format!(
                "route geometry has {} point(s), expected at least 2",
                coordinates.len()
            )));
        }

        let segments = raw
            .segments
            .into_iter()
            .map(|segment| Self::convert_segment(segment, coordinates.len()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Directions {
            distance_meters,
            duration_seconds,
            coordinates,
            segments,
        })
    }

    /// Convert a `[lng, lat]` pair into a point
    fn convert_coordinate(pair: &[f64]) -> Result<GeoPoint, RoutingError> {
        let [lng, lat, ..] = pair else {
            return Err(RoutingError::InvalidResponse(format!(
                "coordinate has {} component(s), expected [lng, lat]",
                pair.len()
            )));
        };
        GeoPoint::new(*lat, *lng).map_err(|e| RoutingError::InvalidResponse(e.to_string()))
    }

    /// Convert a raw segment, checking step way points against the polyline
    fn convert_segment(
        raw: RawSegment,
        point_count: usize,
    ) -> Result<DirectionsSegment, RoutingError> {
        let steps = raw
            .steps
            .into_iter()
            .map(|step| {
                let [start_index, end_index] = step.way_points;
                if start_index > end_index || end_index >= point_count {
                    return Err(RoutingError::InvalidResponse(format!(
                        "way points [{start_index}, {end_index}] outside geometry of {point_count} points"
                    )));
                }
                Ok(DirectionsStep {
                    instruction: step.instruction,
                    distance: non_negative(step.distance, "step.distance")?,
                    duration: non_negative(step.duration, "step.duration")?,
                    start_index,
                    end_index,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DirectionsSegment {
            distance: non_negative(raw.distance, "segment.distance")?,
            duration: non_negative(raw.duration, "segment.duration")?,
            steps,
        })
    }
}

#[async_trait]
impl RoutingClient for OpenRouteServiceClient {
    #[instrument(skip(self), fields(start = %start.to_lng_lat(), end = %end.to_lng_lat()))]
    async fn get_directions(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TransportMode,
        preference: RoutePreference,
    ) -> Result<Directions, RoutingError> {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty())
        else {
            return Err(RoutingError::ConfigurationError(
                "routing API key is not configured".to_string(),
            ));
        };

        let url = format!(
            "{}/v2/directions/{}",
            self.config.base_url,
            backend_profile(mode)
        );

        let params = [
            ("api_key", api_key.to_string()),
            ("start", start.to_lng_lat()),
            ("end", end.to_lng_lat()),
            ("format", "json".to_string()),
            ("geometry", "true".to_string()),
            ("instructions", "true".to_string()),
            ("preference", preference.as_str().to_string()),
        ];

        debug!(?url, %mode, %preference, "Requesting directions");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RoutingError::Unauthorized(format!("HTTP {status}")));
        }

        if !status.is_success() {
            return Err(RoutingError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let directions = Self::parse_directions_response(&body, start, end).inspect_err(|e| {
            warn!(error = %e, "Unusable directions response");
        })?;

        debug!(
            distance_m = directions.distance_meters,
            duration_s = directions.duration_seconds,
            points = directions.coordinates.len(),
            "Directions received"
        );
        Ok(directions)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        self.client
            .get(&url)
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }
}

/// Reject NaN, infinite and negative metrics
fn non_negative(value: f64, field: &str) -> Result<f64, RoutingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(RoutingError::InvalidResponse(format!(
            "{field} must be a non-negative number, got {value}"
        )))
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawDirectionsResponse {
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    summary: RawSummary,
    geometry: RawGeometry,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSummary {
    // Zero-length routes omit both fields
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    instruction: String,
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    way_points: [usize; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> GeoPoint {
        GeoPoint::new_unchecked(12.9767, 77.5713)
    }

    fn end() -> GeoPoint {
        GeoPoint::new_unchecked(12.9698, 77.7500)
    }

    const SAMPLE: &str = r#"{
        "routes": [{
            "summary": { "distance": 21450.3, "duration": 2520.0 },
            "geometry": { "coordinates": [[77.5713, 12.9767], [77.6400, 12.9750], [77.7500, 12.9698]] },
            "segments": [{
                "distance": 21450.3,
                "duration": 2520.0,
                "steps": [
                    { "instruction": "Head east on Kempegowda Road", "distance": 8000.0, "duration": 900.0, "way_points": [0, 1] },
                    { "instruction": "Arrive at Whitefield", "distance": 13450.3, "duration": 1620.0, "way_points": [1, 2] }
                ]
            }]
        }]
    }"#;

    #[test]
    fn test_backend_profiles() {
        assert_eq!(backend_profile(TransportMode::HeavyGoodsVehicle), "driving-hgv");
        assert_eq!(backend_profile(TransportMode::LightCommercialVehicle), "driving-car");
        assert_eq!(backend_profile(TransportMode::Bicycle), "cycling-regular");
        assert_eq!(backend_profile(TransportMode::WalkingDelivery), "foot-walking");
    }

    #[test]
    fn test_parse_directions_response() {
        let directions =
            OpenRouteServiceClient::parse_directions_response(SAMPLE, start(), end()).unwrap();
        assert!((directions.distance_meters - 21450.3).abs() < f64::EPSILON);
        assert!((directions.duration_seconds - 2520.0).abs() < f64::EPSILON);
        assert_eq!(directions.coordinates.len(), 3);
        assert!((directions.coordinates[0].lat() - 12.9767).abs() < f64::EPSILON);
        assert!((directions.coordinates[0].lng() - 77.5713).abs() < f64::EPSILON);
        assert_eq!(directions.segments.len(), 1);
        assert_eq!(directions.segments[0].steps.len(), 2);
        assert_eq!(directions.segments[0].steps[1].start_index, 1);
    }

    #[test]
    fn test_parse_empty_routes() {
        let result =
            OpenRouteServiceClient::parse_directions_response(r#"{ "routes": [] }"#, start(), end());
        assert!(matches!(result, Err(RoutingError::NoRouteFound { .. })));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = OpenRouteServiceClient::parse_directions_response("not json", start(), end());
        assert!(matches!(result, Err(RoutingError::ParseError(_))));
    }

    #[test]
    fn test_parse_rejects_out_of_range_way_points() {
        let json = r#"{
            "routes": [{
                "summary": { "distance": 100.0, "duration": 10.0 },
                "geometry": { "coordinates": [[77.57, 12.97], [77.58, 12.98]] },
                "segments": [{ "distance": 100.0, "duration": 10.0,
                    "steps": [{ "instruction": "Go", "way_points": [0, 5] }] }]
            }]
        }"#;
        let result = OpenRouteServiceClient::parse_directions_response(json, start(), end());
        assert!(matches!(result, Err(RoutingError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_negative_distance() {
        let json = r#"{
            "routes": [{
                "summary": { "distance": -5.0, "duration": 10.0 },
                "geometry": { "coordinates": [[77.57, 12.97], [77.58, 12.98]] }
            }]
        }"#;
        let result = OpenRouteServiceClient::parse_directions_response(json, start(), end());
        assert!(matches!(result, Err(RoutingError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_short_geometry() {
        let json = r#"{
            "routes": [{
                "summary": { "distance": 5.0, "duration": 1.0 },
                "geometry": { "coordinates": [[77.57, 12.97]] }
            }]
        }"#;
        let result = OpenRouteServiceClient::parse_directions_response(json, start(), end());
        assert!(matches!(result, Err(RoutingError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_rejects_malformed_coordinate() {
        let json = r#"{
            "routes": [{
                "summary": { "distance": 5.0, "duration": 1.0 },
                "geometry": { "coordinates": [[77.57], [77.58, 12.98]] }
            }]
        }"#;
        let result = OpenRouteServiceClient::parse_directions_response(json, start(), end());
        assert!(matches!(result, Err(RoutingError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let client = OpenRouteServiceClient::new(&RoutingConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..RoutingConfig::default()
        })
        .unwrap();
        let result = client
            .get_directions(start(), end(), TransportMode::Bicycle, RoutePreference::Fastest)
            .await;
        assert!(matches!(result, Err(RoutingError::ConfigurationError(_))));
    }
}
