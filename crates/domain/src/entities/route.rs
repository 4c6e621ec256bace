//! Computed routes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::GeoPoint;

/// Routing backend preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutePreference {
    /// Minimise travel time
    Fastest,
    /// Minimise travel distance
    Shortest,
    /// Backend's balanced default
    #[default]
    Recommended,
}

impl RoutePreference {
    /// Query-string value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fastest => "fastest",
            Self::Shortest => "shortest",
            Self::Recommended => "recommended",
        }
    }
}

impl fmt::Display for RoutePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutePreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fastest" => Ok(Self::Fastest),
            "shortest" => Ok(Self::Shortest),
            "recommended" => Ok(Self::Recommended),
            _ => Err(DomainError::UnknownPreference(s.to_string())),
        }
    }
}

/// One instruction block of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    /// Length in meters
    pub distance: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Turn instructions in travel order
    pub instructions: Vec<String>,
    /// Points covered by this segment
    pub geometry: Vec<GeoPoint>,
}

/// A path between two points with its metrics
///
/// `geometry` starts at the query's start point and ends at its end point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Total length in meters
    pub distance_meters: f64,
    /// Total duration in seconds
    pub duration_seconds: f64,
    /// Polyline of the route
    pub geometry: Vec<GeoPoint>,
    /// Instruction blocks
    pub segments: Vec<RouteSegment>,
    /// Rounded transport cost, never negative
    pub cost: f64,
}

impl RouteResult {
    /// Total length in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Total duration in hours
    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }

    /// All instructions of all segments, in order
    #[must_use]
    pub fn instructions(&self) -> Vec<String> {
        self.segments
            .iter()
            .flat_map(|segment| segment.instructions.iter().cloned())
            .collect()
    }
}
