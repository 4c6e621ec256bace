//! Routing service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the directions service (OpenRouteService-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Base URL for the directions API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `api_key` query parameter
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RoutingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Check if an API key is configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("routing.base_url must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("routing.timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
