//! Transport-mode optimization results

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::TransportMode;

/// Goal used to pick a mode for each edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationObjective {
    /// Cheapest option
    #[default]
    Cost,
    /// Fastest option
    Time,
    /// Shortest option
    Distance,
    /// Weighted mix of cost, time and distance
    Balanced,
}

impl OptimizationObjective {
    /// Identifier used in configuration and the CLI
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Time => "time",
            Self::Distance => "distance",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for OptimizationObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizationObjective {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cost" => Ok(Self::Cost),
            "time" => Ok(Self::Time),
            "distance" => Ok(Self::Distance),
            "balanced" => Ok(Self::Balanced),
            _ => Err(DomainError::UnknownObjective(s.to_string())),
        }
    }
}

/// Metrics of one transport mode evaluated on one edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeOption {
    /// Evaluated mode
    pub mode: TransportMode,
    /// Route cost
    pub cost: f64,
    /// Route duration in seconds
    pub duration_seconds: f64,
    /// Route length in meters
    pub distance_meters: f64,
    /// Whether the metrics come from the local fallback
    pub is_fallback: bool,
}

impl ModeOption {
    /// Duration in hours
    #[must_use]
    pub fn time_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }

    /// Length in kilometers
    #[must_use]
    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}

/// All options evaluated for one edge and the one selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEvaluation {
    /// Edge identifier
    pub edge_id: String,
    /// Origin node name
    pub from_node: String,
    /// Destination node name
    pub to_node: String,
    /// Mode assigned before optimization
    pub current_mode: TransportMode,
    /// One entry per registered mode, in registry order
    pub options: Vec<ModeOption>,
    /// Mode preferred by the objective
    pub selected_mode: TransportMode,
}

/// Suggestion to switch an edge to another mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRecommendation {
    /// Edge identifier
    pub edge_id: String,
    /// Origin node name
    pub from_node: String,
    /// Destination node name
    pub to_node: String,
    /// Mode assigned today
    pub current_mode: TransportMode,
    /// Mode to switch to
    pub recommended_mode: TransportMode,
    /// Human-readable justification
    pub reason: String,
    /// Objective-specific gain
    pub savings_score: f64,
    /// Cost saved (negative if the switch costs more)
    pub cost_delta: f64,
    /// Hours saved
    pub time_delta_hours: f64,
    /// Kilometers saved
    pub distance_delta_km: f64,
}

/// Unweighted cost/time/distance sums over a set of edges
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkTotals {
    /// Summed cost
    pub cost: f64,
    /// Summed travel time in hours
    pub time_hours: f64,
    /// Summed distance in kilometers
    pub distance_km: f64,
}

impl NetworkTotals {
    /// Totals of the edges as they are currently configured
    #[must_use]
    pub fn of_edges(edges: &[super::Edge]) -> Self {
        edges.iter().fold(Self::default(), |acc, edge| Self {
            cost: acc.cost + edge.cost,
            time_hours: acc.time_hours + edge.travel_time_hr,
            distance_km: acc.distance_km + edge.distance_km,
        })
    }

    /// Totals after subtracting the given savings
    #[must_use]
    pub fn after(&self, savings: &Self) -> Self {
        Self {
            cost: self.cost - savings.cost,
            time_hours: self.time_hours - savings.time_hours,
            distance_km: self.distance_km - savings.distance_km,
        }
    }
}

impl Add for NetworkTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            cost: self.cost + rhs.cost,
            time_hours: self.time_hours + rhs.time_hours,
            distance_km: self.distance_km + rhs.distance_km,
        }
    }
}

/// Outcome of a network-wide mode optimization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Objective that drove the selection
    pub objective: OptimizationObjective,
    /// Per-edge evaluations, in input order
    pub evaluations: Vec<EdgeEvaluation>,
    /// Mode changes worth making
    pub recommendations: Vec<OptimizationRecommendation>,
    /// Totals of the network as given
    pub current_totals: NetworkTotals,
    /// Summed deltas of all recommendations
    pub savings: NetworkTotals,
    /// Ids of edges whose endpoints could not be resolved
    pub skipped_edges: Vec<String>,
}

impl OptimizationReport {
    /// Totals if every recommendation were applied
    #[must_use]
    pub fn projected_totals(&self) -> NetworkTotals {
        self.current_totals.after(&self.savings)
    }
}
