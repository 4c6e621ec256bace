//! Value Objects - Immutable, identity-less domain primitives

mod geo_point;
mod region;
mod transport_mode;

pub use geo_point::{EARTH_RADIUS_METERS, GeoPoint, haversine_distance, is_valid_coordinate};
pub use region::RegionBounds;
pub use transport_mode::{
    TransportMode, TransportModeConfig, TransportModeOverride, TransportModeRegistry,
};
