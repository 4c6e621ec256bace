//! Route service
//!
//! Computes a costed route between two points for a vehicle class. When the
//! routing backend fails or has no route, a straight-line route is derived
//! locally from great-circle distance and the mode's speed profile, so route
//! computation always produces a usable result.

use std::{fmt, sync::Arc};

use domain::{
    GeoPoint, RoutePreference, RouteResult, RouteSegment, TransportMode, TransportModeRegistry,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::ports::{RouteRequest, RoutedPath, RoutingPort};

/// Default operational surcharge per hour of travel (currency units)
pub const DEFAULT_HOURLY_SURCHARGE: f64 = 50.0;

/// Tunables of the route service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteServiceConfig {
    /// Cost added per hour of travel on backend-routed paths
    pub hourly_surcharge: f64,
}

impl Default for RouteServiceConfig {
    fn default() -> Self {
        Self {
            hourly_surcharge: DEFAULT_HOURLY_SURCHARGE,
        }
    }
}

/// Result of a route computation, tagged with the path that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RouteOutcome {
    /// Route computed by the routing backend
    Routed(RouteResult),
    /// Straight-line route computed locally after a backend failure
    Fallback {
        /// The synthetic route
        route: RouteResult,
        /// Why the backend result was not used
        reason: String,
    },
}

impl RouteOutcome {
    /// Borrow the route regardless of how it was produced
    #[must_use]
    pub const fn route(&self) -> &RouteResult {
        match self {
            Self::Routed(route) | Self::Fallback { route, .. } => route,
        }
    }

    /// Take the route regardless of how it was produced
    #[must_use]
    pub fn into_route(self) -> RouteResult {
        match self {
            Self::Routed(route) | Self::Fallback { route, .. } => route,
        }
    }

    /// Whether the local fallback was used
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Route service for costed point-to-point routes
pub struct RouteService {
    routing_port: Arc<dyn RoutingPort>,
    registry: Arc<TransportModeRegistry>,
    config: RouteServiceConfig,
}

impl fmt::Debug for RouteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteService {
    /// Create a new route service
    pub fn new(
        routing_port: Arc<dyn RoutingPort>,
        registry: Arc<TransportModeRegistry>,
        config: RouteServiceConfig,
    ) -> Self {
        Self {
            routing_port,
            registry,
            config,
        }
    }

    /// The transport mode table used for costing
    #[must_use]
    pub fn registry(&self) -> &TransportModeRegistry {
        &self.registry
    }

    /// Compute a route; never fails
    ///
    /// Backend errors and empty results are logged and answered with
    /// [`RouteOutcome::Fallback`].
    #[instrument(skip(self), fields(start = %start, end = %end))]
    pub async fn calculate_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TransportMode,
        preference: RoutePreference,
    ) -> RouteOutcome {
        let request = RouteRequest::new(start, end, mode).with_preference(preference);

        match self.routing_port.route(&request).await {
            Ok(path) => {
                let route = self.costed(path, mode);
                debug!(
                    distance_m = route.distance_meters,
                    duration_s = route.duration_seconds,
                    cost = route.cost,
                    "Route computed by backend"
                );
                RouteOutcome::Routed(route)
            },
            Err(e) => {
                warn!(error = %e, %mode, "Routing backend failed, using straight-line fallback");
                RouteOutcome::Fallback {
                    route: self.fallback_route(start, end, mode),
                    reason: e.to_string(),
                }
            },
        }
    }

    /// Straight-line route between two points
    ///
    /// Duration assumes the mode's maximum speed. Cost covers distance only,
    /// without the hourly surcharge.
    #[must_use]
    pub fn fallback_route(&self, start: GeoPoint, end: GeoPoint, mode: TransportMode) -> RouteResult {
        let profile = self.registry.lookup(mode);
        let distance_meters = start.distance_meters(&end);
        let distance_km = distance_meters / 1000.0;
        let duration_seconds = distance_km / profile.max_speed_kmh * 3600.0;

        RouteResult {
            distance_meters,
            duration_seconds,
            geometry: vec![start, end],
            segments: vec![RouteSegment {
                distance: distance_meters,
                duration: duration_seconds,
                instructions: vec![format!(
                    "Travel {distance_km:.2} km in a straight line to the destination"
                )],
                geometry: vec![start, end],
            }],
            cost: (distance_km * profile.cost_per_km).round(),
        }
    }

    fn costed(&self, path: RoutedPath, mode: TransportMode) -> RouteResult {
        let profile = self.registry.lookup(mode);
        let distance_km = path.distance_meters / 1000.0;
        let duration_hours = path.duration_seconds / 3600.0;
        let cost = distance_km.mul_add(
            profile.cost_per_km,
            duration_hours * self.config.hourly_surcharge,
        );

        RouteResult {
            distance_meters: path.distance_meters,
            duration_seconds: path.duration_seconds,
            geometry: path.geometry,
            segments: path.segments,
            cost: cost.round(),
        }
    }
}
