//! Operational tunables: costing, transport modes and geocode caching.

use application::{DEFAULT_HOURLY_SURCHARGE, GeocodeServiceConfig, RouteServiceConfig};
use domain::{RegionBounds, TransportMode, TransportModeOverride, TransportModeRegistry};
use serde::{Deserialize, Serialize};

// ==============================
// Operations Configuration
// ==============================

/// Costing constants shared by all routes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OperationsConfig {
    /// Cost added per hour of travel on backend-routed paths
    #[serde(default = "default_hourly_surcharge")]
    pub hourly_surcharge: f64,
}

const fn default_hourly_surcharge() -> f64 {
    DEFAULT_HOURLY_SURCHARGE
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            hourly_surcharge: default_hourly_surcharge(),
        }
    }
}

impl OperationsConfig {
    /// Route service settings derived from this section
    #[must_use]
    pub const fn route_service_config(&self) -> RouteServiceConfig {
        RouteServiceConfig {
            hourly_surcharge: self.hourly_surcharge,
        }
    }
}

// ==============================
// Transport Mode Overrides
// ==============================

/// Per-mode overrides of the built-in cost and speed table
///
/// ```toml
/// [transport_modes.bicycle]
/// cost_per_km = 4.0
/// max_speed_kmh = 20.0
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TransportModesConfig {
    #[serde(default)]
    pub heavy_goods_vehicle: Option<TransportModeOverride>,
    #[serde(default)]
    pub light_commercial_vehicle: Option<TransportModeOverride>,
    #[serde(default)]
    pub bicycle: Option<TransportModeOverride>,
    #[serde(default)]
    pub walking_delivery: Option<TransportModeOverride>,
}

impl TransportModesConfig {
    /// Build the mode table with overrides applied
    #[must_use]
    pub fn registry(&self) -> TransportModeRegistry {
        [
            (TransportMode::HeavyGoodsVehicle, self.heavy_goods_vehicle),
            (TransportMode::LightCommercialVehicle, self.light_commercial_vehicle),
            (TransportMode::Bicycle, self.bicycle),
            (TransportMode::WalkingDelivery, self.walking_delivery),
        ]
        .into_iter()
        .fold(TransportModeRegistry::default(), |registry, (mode, patch)| {
            match patch {
                Some(patch) => registry.with_override(mode, patch),
                None => registry,
            }
        })
    }
}

// ==============================
// Geocode Cache Configuration
// ==============================

/// Geocode cache size and suggestion limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeocodeCacheConfig {
    /// Maximum entries per cache (forward and reverse)
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,

    /// Result limit of plain searches
    #[serde(default = "default_limit")]
    pub default_limit: u8,

    /// Result limit of postal code suggestions
    #[serde(default = "default_limit")]
    pub postal_code_limit: u8,

    /// Result limit of address suggestions
    #[serde(default = "default_address_limit")]
    pub address_limit: u8,

    /// Minimum input length for suggestions
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

const fn default_max_capacity() -> u64 {
    10_000
}

const fn default_limit() -> u8 {
    5
}

const fn default_address_limit() -> u8 {
    8
}

const fn default_min_query_len() -> usize {
    3
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
            default_limit: default_limit(),
            postal_code_limit: default_limit(),
            address_limit: default_address_limit(),
            min_query_len: default_min_query_len(),
        }
    }
}

impl GeocodeCacheConfig {
    /// Geocode service settings for the given operating region
    #[must_use]
    pub const fn geocode_service_config(&self, region: RegionBounds) -> GeocodeServiceConfig {
        GeocodeServiceConfig {
            region,
            max_capacity: self.max_capacity,
            default_limit: self.default_limit,
            postal_code_limit: self.postal_code_limit,
            address_limit: self.address_limit,
            min_query_len: self.min_query_len,
        }
    }
}

// ==============================
// Logging Configuration
// ==============================

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `application=debug,info`
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}
