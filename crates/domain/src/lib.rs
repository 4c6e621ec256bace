//! Domain layer for LogiRoute
//!
//! Contains the logistics network model, vehicle classes, route and
//! optimization results, and great-circle math. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
