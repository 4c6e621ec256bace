//! Routing and geocoding integration for LogiRoute
//!
//! Provides road routing via an [OpenRouteService](https://openrouteservice.org)-style
//! directions API and address geocoding via
//! [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org).
//!
//! # Architecture
//!
//! [`RoutingClient`] defines the interface for directions lookups and is
//! implemented by [`OpenRouteServiceClient`]. [`GeocodingClient`] handles
//! forward and reverse address resolution via [`NominatimGeocodingClient`].
//! Raw backend JSON is validated into [`Directions`] and [`Place`] before it
//! leaves this crate, so callers never see missing or non-finite fields.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::{GeoPoint, RoutePreference, TransportMode};
//! use integration_routing::{OpenRouteServiceClient, RoutingClient, RoutingConfig};
//!
//! let client = OpenRouteServiceClient::new(&RoutingConfig::default())?;
//! let directions = client.get_directions(
//!     GeoPoint::new(12.9767, 77.5713)?,
//!     GeoPoint::new(12.9698, 77.7500)?,
//!     TransportMode::LightCommercialVehicle,
//!     RoutePreference::Fastest,
//! ).await?;
//! ```

mod client;
mod config;
mod error;
mod geocoding;
mod models;

pub use client::{OpenRouteServiceClient, RoutingClient, backend_profile};
pub use config::RoutingConfig;
pub use error::RoutingError;
pub use geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, SearchRequest,
};
pub use models::{Directions, DirectionsSegment, DirectionsStep, Place, PlaceAddress};
