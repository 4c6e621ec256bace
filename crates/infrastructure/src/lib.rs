//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the routing and geocoding
//! clients, and provides configuration loading, logging setup, network
//! file I/O and service wiring.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod network;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::Services;
pub use config::{
    AppConfig, GeocodeCacheConfig, LoggingConfig, OperationsConfig, TransportModesConfig,
};
pub use network::{NetworkFile, NetworkFileError, load_network, save_network};
pub use telemetry::{TelemetryError, init_logging};
