//! Service wiring from configuration

use std::sync::Arc;

use application::{
    GeocodeService, GeocodingPort, NetworkOptimizer, RouteService, RoutingPort, TourSequencer,
    error::ApplicationError,
};
use tracing::info;

use crate::{
    adapters::{GeocodingAdapter, RoutingAdapter},
    config::AppConfig,
};

/// All application services, wired to the configured backends
pub struct Services {
    /// Costed point-to-point routes
    pub routes: Arc<RouteService>,
    /// Stop ordering
    pub tours: TourSequencer,
    /// Per-edge mode selection
    pub optimizer: NetworkOptimizer,
    /// Cached address lookups
    pub geocoder: GeocodeService,
    routing_port: Arc<dyn RoutingPort>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("routes", &self.routes)
            .field("geocoder", &self.geocoder)
            .finish_non_exhaustive()
    }
}

impl Services {
    /// Build the HTTP adapters and services described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApplicationError> {
        let routing: Arc<dyn RoutingPort> = Arc::new(RoutingAdapter::from_config(&config.routing)?);
        let geocoding: Arc<dyn GeocodingPort> =
            Arc::new(GeocodingAdapter::from_config(&config.geocoding)?);

        let services = Self::with_ports(config, routing, geocoding);
        info!(
            routing = %config.routing.base_url,
            geocoding = %config.geocoding.base_url,
            "Services initialized"
        );
        Ok(services)
    }

    /// Wire services around already-built ports
    pub fn with_ports(
        config: &AppConfig,
        routing: Arc<dyn RoutingPort>,
        geocoding: Arc<dyn GeocodingPort>,
    ) -> Self {
        let registry = Arc::new(config.transport_modes.registry());
        let routes = Arc::new(RouteService::new(
            Arc::clone(&routing),
            Arc::clone(&registry),
            config.operations.route_service_config(),
        ));

        Self {
            tours: TourSequencer::new(registry),
            optimizer: NetworkOptimizer::new(Arc::clone(&routes)),
            geocoder: GeocodeService::new(
                geocoding,
                config.geocode_cache.geocode_service_config(config.region),
            ),
            routes,
            routing_port: routing,
        }
    }

    /// Whether the routing backend answers its health probe
    pub async fn routing_available(&self) -> bool {
        self.routing_port.is_available().await
    }

    /// Whether the geocoding backend answers its health probe
    pub async fn geocoding_available(&self) -> bool {
        self.geocoder.is_available().await
    }
}
