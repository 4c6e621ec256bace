//! Application layer - Use cases and orchestration
//!
//! Contains the route provider, tour sequencing, network optimization and
//! geocoding use cases together with the ports they depend on. Adapters in
//! the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
