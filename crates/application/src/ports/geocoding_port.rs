//! Geocoding service port
//!
//! Defines the interface for forward and reverse address resolution.

use async_trait::async_trait;
use domain::{GeoPoint, GeocodeResult, RegionBounds, ReverseGeocodeResult};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A free-text search against the geocoding backend
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeQuery {
    /// Search text
    pub text: String,
    /// Maximum number of results
    pub limit: u8,
    /// Preferred search area
    pub viewbox: Option<RegionBounds>,
    /// Restrict results to the viewbox instead of just preferring it
    pub bounded: bool,
}

/// Port for geocoding backends
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve free text into candidate places, best match first
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeResult>, ApplicationError>;

    /// Resolve a coordinate into an address
    async fn reverse(&self, point: GeoPoint) -> Result<ReverseGeocodeResult, ApplicationError>;

    /// Check if the geocoding backend is reachable
    async fn is_available(&self) -> bool;
}
