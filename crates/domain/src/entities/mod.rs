//! Domain entities - Network records and computation results

mod geocode;
mod network;
mod optimization;
mod route;

pub use geocode::{Address, GeocodeOptions, GeocodeResult, ReverseGeocodeResult};
pub use network::{Edge, Node, NodeType, find_node};
pub use optimization::{
    EdgeEvaluation, ModeOption, NetworkTotals, OptimizationObjective, OptimizationRecommendation,
    OptimizationReport,
};
pub use route::{RoutePreference, RouteResult, RouteSegment};
