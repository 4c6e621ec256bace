//! Application services - Use case implementations

mod geocode_service;
mod network_optimizer;
mod route_service;
mod tour_sequencer;

pub use geocode_service::{GeocodeService, GeocodeServiceConfig, ParsedInput, parse_input};
pub use network_optimizer::{
    BALANCED_HOUR_WEIGHT, BALANCED_KM_WEIGHT, NetworkOptimizer, recommend, select_best,
};
pub use route_service::{DEFAULT_HOURLY_SURCHARGE, RouteOutcome, RouteService, RouteServiceConfig};
pub use tour_sequencer::{TourPlan, TourSequencer};
