//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Coordinates outside the WGS84 range
    #[error("Invalid coordinates ({lat}, {lng}): latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates { lat: f64, lng: f64 },

    /// Node record failed ingestion checks
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Edge record failed ingestion checks
    #[error("Invalid edge {id}: {reason}")]
    InvalidEdge { id: String, reason: String },

    /// Transport mode identifier not in the registry
    #[error("Unknown transport mode: {0}")]
    UnknownTransportMode(String),

    /// Optimization objective identifier not recognised
    #[error("Unknown optimization objective: {0}")]
    UnknownObjective(String),

    /// Route preference identifier not recognised
    #[error("Unknown route preference: {0}")]
    UnknownPreference(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create an invalid edge error
    pub fn invalid_edge(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEdge {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
