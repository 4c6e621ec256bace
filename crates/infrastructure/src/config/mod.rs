//! Application configuration
//!
//! Split into focused sub-modules:
//! - `operations`: costing constants, transport mode overrides, geocode
//!   cache limits and logging
//!
//! Backend client settings reuse the integration crate's config types.
//!
//! Sources, lowest precedence first: built-in defaults, the config file
//! (`logiroute.toml` in the working directory unless a path is given), then
//! `LOGIROUTE_`-prefixed environment variables with `__` between nested keys,
//! e.g. `LOGIROUTE_ROUTING__API_KEY`.

mod operations;

use std::path::Path;

use domain::RegionBounds;
use integration_routing::{NominatimConfig, RoutingConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use operations::{GeocodeCacheConfig, LoggingConfig, OperationsConfig, TransportModesConfig};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "LOGIROUTE";

/// Config file looked up in the working directory (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "logiroute";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directions backend
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Geocoding backend
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Operating region for bounded searches and region checks
    #[serde(default)]
    pub region: RegionBounds,

    /// Costing constants
    #[serde(default)]
    pub operations: OperationsConfig,

    /// Overrides of the transport mode table
    #[serde(default)]
    pub transport_modes: TransportModesConfig,

    /// Geocode cache size and suggestion limits
    #[serde(default)]
    pub geocode_cache: GeocodeCacheConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(
            path,
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with_env(
        path: Option<&Path>,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        debug!(
            routing = %config.routing.base_url,
            geocoding = %config.geocoding.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check cross-field constraints the types cannot express
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.routing.validate().map_err(config::ConfigError::Message)?;
        self.region
            .validate()
            .map_err(|e| config::ConfigError::Message(format!("region: {e}")))?;

        if self.geocoding.base_url.is_empty() {
            return Err(config::ConfigError::Message(
                "geocoding.base_url must not be empty".to_string(),
            ));
        }
        if !(self.operations.hourly_surcharge.is_finite() && self.operations.hourly_surcharge >= 0.0)
        {
            return Err(config::ConfigError::Message(
                "operations.hourly_surcharge must be a non-negative number".to_string(),
            ));
        }
        if self.geocode_cache.max_capacity == 0 {
            return Err(config::ConfigError::Message(
                "geocode_cache.max_capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::TransportMode;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(
                vars.iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sources() {
        let config = AppConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config.routing.base_url, "https://api.openrouteservice.org");
        assert!(config.routing.api_key.is_none());
        assert_eq!(config.region, RegionBounds::bengaluru());
        assert!((config.operations.hourly_surcharge - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn file_values_are_loaded() {
        let file = toml_file(
            r#"
            [routing]
            api_key = "file-key"
            timeout_secs = 20

            [region]
            south = 18.40
            north = 18.65
            west = 73.70
            east = 74.00

            [operations]
            hourly_surcharge = 75.0

            [transport_modes.bicycle]
            cost_per_km = 4.0

            [geocode_cache]
            address_limit = 10
            "#,
        );

        let config = AppConfig::load_with_env(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.routing.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.routing.timeout_secs, 20);
        assert!(config.region.contains(18.52, 73.85));
        assert!((config.operations.hourly_surcharge - 75.0).abs() < f64::EPSILON);
        assert!(
            (config.transport_modes.registry().lookup(TransportMode::Bicycle).cost_per_km - 4.0)
                .abs()
                < f64::EPSILON
        );
        assert_eq!(config.geocode_cache.address_limit, 10);
        assert_eq!(config.geocode_cache.postal_code_limit, 5);
    }

    #[test]
    fn environment_overrides_file() {
        let file = toml_file(
            r#"
            [routing]
            api_key = "file-key"
            "#,
        );

        let config = AppConfig::load_with_env(
            Some(file.path()),
            env(&[
                ("LOGIROUTE_ROUTING__API_KEY", "env-key"),
                ("LOGIROUTE_LOGGING__JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(config.routing.api_key.as_deref(), Some("env-key"));
        assert!(config.logging.json);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_with_env(
            Some(Path::new("/nonexistent/logiroute.toml")),
            env(&[]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn inverted_region_is_rejected() {
        let file = toml_file(
            r#"
            [region]
            south = 13.2
            north = 12.7
            west = 77.4
            east = 77.8
            "#,
        );
        assert!(AppConfig::load_with_env(Some(file.path()), env(&[])).is_err());
    }

    #[test]
    fn zero_cache_capacity_is_rejected() {
        let config = AppConfig {
            geocode_cache: GeocodeCacheConfig {
                max_capacity: 0,
                ..GeocodeCacheConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
