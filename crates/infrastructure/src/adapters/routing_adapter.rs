//! Routing adapter - Implements RoutingPort using integration_routing

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{RouteRequest, RoutedPath, RoutingPort};
use async_trait::async_trait;
use domain::RouteSegment;
use integration_routing::{
    Directions, OpenRouteServiceClient, RoutingClient, RoutingConfig, RoutingError,
};
use tracing::{debug, instrument};

/// Adapter for road routing over an OpenRouteService-style directions API
pub struct RoutingAdapter {
    client: Arc<dyn RoutingClient>,
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter").finish_non_exhaustive()
    }
}

impl RoutingAdapter {
    /// Create a new routing adapter around a directions client
    pub fn new(client: Arc<dyn RoutingClient>) -> Self {
        Self { client }
    }

    /// Create an adapter backed by an OpenRouteService client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &RoutingConfig) -> Result<Self, ApplicationError> {
        let client = OpenRouteServiceClient::new(config).map_err(map_routing_error)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Convert directions into a port-level path
    ///
    /// Every instruction step becomes one route segment holding the polyline
    /// points its own way points span. Steps keep their backend order across
    /// legs.
    fn convert_directions(directions: Directions) -> RoutedPath {
        let segments = directions
            .segments
            .iter()
            .flat_map(|segment| &segment.steps)
            .map(|step| RouteSegment {
                distance: step.distance,
                duration: step.duration,
                instructions: vec![step.instruction.clone()],
                geometry: directions.step_geometry(step),
            })
            .collect();

        RoutedPath {
            distance_meters: directions.distance_meters,
            duration_seconds: directions.duration_seconds,
            geometry: directions.coordinates,
            segments,
        }
    }
}

/// Map a routing client error to the application taxonomy
fn map_routing_error(error: RoutingError) -> ApplicationError {
    match error {
        RoutingError::NoRouteFound { .. } => ApplicationError::EmptyResult(error.to_string()),
        RoutingError::RateLimitExceeded { .. } => ApplicationError::RateLimited,
        RoutingError::Unauthorized(_) | RoutingError::ConfigurationError(_) => {
            ApplicationError::Configuration(error.to_string())
        },
        RoutingError::ConnectionFailed(_)
        | RoutingError::RequestFailed(_)
        | RoutingError::ParseError(_)
        | RoutingError::InvalidResponse(_)
        | RoutingError::Timeout { .. } => {
            ApplicationError::ExternalService(format!("Routing failed: {error}"))
        },
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self), fields(mode = %request.mode))]
    async fn route(&self, request: &RouteRequest) -> Result<RoutedPath, ApplicationError> {
        let directions = self
            .client
            .get_directions(request.start, request.end, request.mode, request.preference)
            .await
            .map_err(map_routing_error)?;

        let path = Self::convert_directions(directions);
        debug!(
            segments = path.segments.len(),
            points = path.geometry.len(),
            "Converted directions"
        );
        Ok(path)
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use domain::{GeoPoint, RoutePreference, TransportMode};
    use integration_routing::{DirectionsSegment, DirectionsStep};

    use super::*;

    #[derive(Debug)]
    struct StubClient {
        result: fn() -> Result<Directions, RoutingError>,
    }

    #[async_trait]
    impl RoutingClient for StubClient {
        async fn get_directions(
            &self,
            _start: GeoPoint,
            _end: GeoPoint,
            _mode: TransportMode,
            _preference: RoutePreference,
        ) -> Result<Directions, RoutingError> {
            (self.result)()
        }

        async fn is_healthy(&self) -> bool {
            true
        }
    }

    fn step(instruction: &str, start_index: usize, end_index: usize) -> DirectionsStep {
        DirectionsStep {
            instruction: instruction.to_string(),
            distance: 100.0,
            duration: 10.0,
            start_index,
            end_index,
        }
    }

    fn directions() -> Result<Directions, RoutingError> {
        Ok(Directions {
            distance_meters: 5000.0,
            duration_seconds: 600.0,
            coordinates: vec![
                GeoPoint::new_unchecked(12.90, 77.60),
                GeoPoint::new_unchecked(12.91, 77.61),
                GeoPoint::new_unchecked(12.92, 77.62),
                GeoPoint::new_unchecked(12.93, 77.63),
            ],
            segments: vec![
                DirectionsSegment {
                    distance: 3000.0,
                    duration: 400.0,
                    steps: vec![step("Head north", 0, 1), step("Turn left", 1, 2)],
                },
                DirectionsSegment {
                    distance: 2000.0,
                    duration: 200.0,
                    steps: vec![step("Arrive", 2, 3)],
                },
            ],
        })
    }

    fn request() -> RouteRequest {
        RouteRequest::new(
            GeoPoint::new_unchecked(12.90, 77.60),
            GeoPoint::new_unchecked(12.93, 77.63),
            TransportMode::LightCommercialVehicle,
        )
    }

    #[tokio::test]
    async fn converts_each_step_to_its_own_segment() {
        let adapter = RoutingAdapter::new(Arc::new(StubClient { result: directions }));

        let path = adapter.route(&request()).await.unwrap();
        assert_eq!(path.geometry.len(), 4);
        assert_eq!(path.segments.len(), 3);

        let instructions: Vec<&str> = path
            .segments
            .iter()
            .flat_map(|s| s.instructions.iter().map(String::as_str))
            .collect();
        assert_eq!(instructions, vec!["Head north", "Turn left", "Arrive"]);

        // Each step covers only the points between its own way points.
        assert_eq!(path.segments[0].geometry, path.geometry[0..=1].to_vec());
        assert_eq!(path.segments[1].geometry, path.geometry[1..=2].to_vec());
        assert_eq!(path.segments[2].geometry, path.geometry[2..=3].to_vec());
        assert!((path.segments[2].distance - 100.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn no_route_maps_to_empty_result() {
        let adapter = RoutingAdapter::new(Arc::new(StubClient {
            result: || {
                Err(RoutingError::NoRouteFound {
                    from: "a".into(),
                    to: "b".into(),
                })
            },
        }));

        let result = adapter.route(&request()).await;
        assert!(matches!(result, Err(ApplicationError::EmptyResult(_))));
    }

    #[test]
    fn error_mapping() {
        assert!(matches!(
            map_routing_error(RoutingError::RateLimitExceeded {
                retry_after_secs: None
            }),
            ApplicationError::RateLimited
        ));
        assert!(matches!(
            map_routing_error(RoutingError::Unauthorized("HTTP 403".into())),
            ApplicationError::Configuration(_)
        ));
        assert!(matches!(
            map_routing_error(RoutingError::Timeout { timeout_secs: 10 }),
            ApplicationError::ExternalService(_)
        ));
        assert!(matches!(
            map_routing_error(RoutingError::InvalidResponse("NaN".into())),
            ApplicationError::ExternalService(_)
        ));
    }
}
