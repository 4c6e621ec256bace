//! Geocoding results

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Structured address components
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    /// Short "road, suburb, city" label, skipping missing parts
    #[must_use]
    pub fn short_label(&self) -> String {
        [&self.road, &self.suburb, &self.city]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A place matching a forward lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
    pub address: Address,
    pub place_id: u64,
    /// Backend relevance score (0 to 1)
    pub importance: f64,
    /// Place type, e.g. `mall` or `postcode`
    pub category: String,
}

impl GeocodeResult {
    /// Position of the place
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.lat, self.lng)
    }
}

/// Address found for a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    pub display_name: String,
    pub address: Address,
}

/// Options of a forward lookup; part of the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeocodeOptions {
    /// Maximum number of results
    pub limit: u8,
    /// Restrict results to the operating region
    pub bounded: bool,
}

impl Default for GeocodeOptions {
    fn default() -> Self {
        Self {
            limit: 5,
            bounded: true,
        }
    }
}

impl GeocodeOptions {
    /// Options with a different result limit
    #[must_use]
    pub const fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_skips_missing_parts() {
        let address = Address {
            road: Some("Hosur Road".into()),
            city: Some("Bengaluru".into()),
            ..Address::default()
        };
        assert_eq!(address.short_label(), "Hosur Road, Bengaluru");
    }

    #[test]
    fn test_default_options_are_bounded() {
        let options = GeocodeOptions::default();
        assert!(options.bounded);
        assert_eq!(options.with_limit(3).limit, 3);
    }
}
