//! Supply-chain network nodes and edges

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoPoint, TransportMode, is_valid_coordinate};

/// Role of a node in the supply chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Production site
    Source,
    /// Distribution hub
    Intermediate,
    /// Retail demand point
    Customer,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Source => "source",
            Self::Intermediate => "intermediate",
            Self::Customer => "customer",
        };
        f.write_str(name)
    }
}

/// A fixed location in the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: String,
    /// Display name, referenced by edges
    pub name: String,
    /// Role in the supply chain
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Storage or throughput capacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    /// Shelf life of the goods handled here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perishability_hours: Option<f64>,
}

impl Node {
    /// Create a validated node
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the coordinates are out of range.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        node_type: NodeType,
        lat: f64,
        lng: f64,
    ) -> Result<Self, DomainError> {
        let node = Self {
            id: id.into(),
            name: name.into(),
            node_type,
            lat,
            lng,
            capacity: None,
            perishability_hours: None,
        };
        node.validate()?;
        Ok(node)
    }

    /// Set the capacity
    #[must_use]
    pub const fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the perishability window
    #[must_use]
    pub const fn with_perishability_hours(mut self, hours: f64) -> Self {
        self.perishability_hours = Some(hours);
        self
    }

    /// Check ingestion invariants
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidNode(format!(
                "node {} has an empty name",
                self.id
            )));
        }
        if !is_valid_coordinate(self.lat, self.lng) {
            return Err(DomainError::InvalidCoordinates {
                lat: self.lat,
                lng: self.lng,
            });
        }
        if self.capacity.is_some_and(|c| c < 0.0) {
            return Err(DomainError::InvalidNode(format!(
                "node {} has negative capacity",
                self.name
            )));
        }
        Ok(())
    }

    /// Position of the node
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.lat, self.lng)
    }
}

/// Directed transport connection between two named nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: String,
    /// Name of the origin node
    pub from_node: String,
    /// Name of the destination node
    pub to_node: String,
    /// Length in kilometers
    pub distance_km: f64,
    /// Travel time in hours
    pub travel_time_hr: f64,
    /// Transport cost in currency units
    pub cost: f64,
    /// Vehicle class currently assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport_mode: Option<TransportMode>,
    /// Routed path, if one was computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_geometry: Option<Vec<GeoPoint>>,
    /// Turn-by-turn instructions, if a route was computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
}

impl Edge {
    /// Create a validated edge without a mode or route
    ///
    /// # Errors
    ///
    /// Returns an error if distance or time is not positive or cost is negative.
    pub fn new(
        id: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        distance_km: f64,
        travel_time_hr: f64,
        cost: f64,
    ) -> Result<Self, DomainError> {
        let edge = Self {
            id: id.into(),
            from_node: from_node.into(),
            to_node: to_node.into(),
            distance_km,
            travel_time_hr,
            cost,
            transport_mode: None,
            route_geometry: None,
            instructions: None,
        };
        edge.validate()?;
        Ok(edge)
    }

    /// Assign a transport mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TransportMode) -> Self {
        self.transport_mode = Some(mode);
        self
    }

    /// Check ingestion invariants
    ///
    /// # Errors
    ///
    /// Returns an error describing the first violated invariant.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.from_node.trim().is_empty() || self.to_node.trim().is_empty() {
            return Err(DomainError::invalid_edge(&self.id, "endpoints must be named"));
        }
        if !(self.distance_km.is_finite() && self.distance_km > 0.0) {
            return Err(DomainError::invalid_edge(&self.id, "distance must be positive"));
        }
        if !(self.travel_time_hr.is_finite() && self.travel_time_hr > 0.0) {
            return Err(DomainError::invalid_edge(&self.id, "travel time must be positive"));
        }
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err(DomainError::invalid_edge(&self.id, "cost must not be negative"));
        }
        Ok(())
    }

    /// Assigned mode, defaulting to heavy goods vehicle
    #[must_use]
    pub fn current_mode(&self) -> TransportMode {
        self.transport_mode.unwrap_or_default()
    }
}

/// Find a node by its name
#[must_use]
pub fn find_node<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Node> {
    nodes.iter().find(|node| node.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> Node {
        Node::new("n1", "Peenya Plant", NodeType::Source, 13.0285, 77.5197).unwrap()
    }

    #[test]
    fn test_node_location() {
        let node = sample_node();
        assert!((node.location().lat() - 13.0285).abs() < f64::EPSILON);
    }

    #[test]
    fn test_node_rejects_bad_coordinates() {
        assert!(Node::new("n1", "Nowhere", NodeType::Customer, 95.0, 0.0).is_err());
    }

    #[test]
    fn test_node_rejects_blank_name() {
        assert!(Node::new("n1", "  ", NodeType::Customer, 12.0, 77.0).is_err());
    }

    #[test]
    fn test_node_type_serializes_as_type_field() {
        let node = sample_node().with_capacity(500.0);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "source");
        assert_eq!(json["capacity"], 500.0);
        assert!(json.get("perishability_hours").is_none());
    }

    #[test]
    fn test_edge_validation() {
        assert!(Edge::new("e1", "A", "B", 10.0, 0.5, 120.0).is_ok());
        assert!(Edge::new("e1", "A", "B", 0.0, 0.5, 120.0).is_err());
        assert!(Edge::new("e1", "A", "B", 10.0, 0.0, 120.0).is_err());
        assert!(Edge::new("e1", "A", "B", 10.0, 0.5, -1.0).is_err());
        assert!(Edge::new("e1", "A", "B", 10.0, 0.5, 0.0).is_ok());
    }

    #[test]
    fn test_edge_current_mode_defaults_to_hgv() {
        let edge = Edge::new("e1", "A", "B", 10.0, 0.5, 120.0).unwrap();
        assert_eq!(edge.current_mode(), TransportMode::HeavyGoodsVehicle);

        let edge = edge.with_mode(TransportMode::Bicycle);
        assert_eq!(edge.current_mode(), TransportMode::Bicycle);
    }

    #[test]
    fn test_find_node() {
        let nodes = vec![sample_node()];
        assert!(find_node(&nodes, "Peenya Plant").is_some());
        assert!(find_node(&nodes, "Hosur Hub").is_none());
    }

    #[test]
    fn test_edge_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "e7",
            "from_node": "Plant",
            "to_node": "Hub",
            "distance_km": 12.5,
            "travel_time_hr": 0.4,
            "cost": 310.0
        }"#;
        let edge: Edge = serde_json::from_str(json).unwrap();
        assert!(edge.transport_mode.is_none());
        assert!(edge.route_geometry.is_none());
        assert!(edge.validate().is_ok());
    }
}
