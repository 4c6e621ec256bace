//! Routing service port
//!
//! Defines the interface for road routing between two points. Adapters in the
//! infrastructure layer implement this port on top of a directions API.

use async_trait::async_trait;
use domain::{GeoPoint, RoutePreference, RouteSegment, TransportMode};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// A routing request between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Origin
    pub start: GeoPoint,
    /// Destination
    pub end: GeoPoint,
    /// Vehicle class
    pub mode: TransportMode,
    /// Optimization profile of the backend
    pub preference: RoutePreference,
}

impl RouteRequest {
    /// Create a request with the default preference
    #[must_use]
    pub fn new(start: GeoPoint, end: GeoPoint, mode: TransportMode) -> Self {
        Self {
            start,
            end,
            mode,
            preference: RoutePreference::default(),
        }
    }

    /// Set the route preference
    #[must_use]
    pub const fn with_preference(mut self, preference: RoutePreference) -> Self {
        self.preference = preference;
        self
    }
}

/// A path as computed by the routing backend, before costing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedPath {
    /// Length in meters
    pub distance_meters: f64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Polyline from start to end
    pub geometry: Vec<GeoPoint>,
    /// Legs with their turn instructions
    pub segments: Vec<RouteSegment>,
}

/// Port for routing backends
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Compute a path for the request
    ///
    /// Returns `ApplicationError::EmptyResult` when the backend has no route.
    async fn route(&self, request: &RouteRequest) -> Result<RoutedPath, ApplicationError>;

    /// Check if the routing backend is reachable
    async fn is_available(&self) -> bool;
}
