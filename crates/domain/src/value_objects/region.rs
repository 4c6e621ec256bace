//! Operating region bounding box

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Inclusive latitude/longitude bounding box of the operating region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    /// Southern edge (minimum latitude)
    pub south: f64,
    /// Northern edge (maximum latitude)
    pub north: f64,
    /// Western edge (minimum longitude)
    pub west: f64,
    /// Eastern edge (maximum longitude)
    pub east: f64,
}

impl Default for RegionBounds {
    fn default() -> Self {
        Self::bengaluru()
    }
}

impl RegionBounds {
    /// Greater Bengaluru
    #[must_use]
    pub const fn bengaluru() -> Self {
        Self {
            south: 12.7342,
            north: 13.1394,
            west: 77.4272,
            east: 77.7814,
        }
    }

    /// Whether a coordinate lies inside the box (edges included)
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }

    /// Check that the box is non-empty and within WGS84 range
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the offending edge.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(-90.0..=90.0).contains(&self.south) || !(-90.0..=90.0).contains(&self.north) {
            return Err(DomainError::ValidationError(
                "region latitude must be -90 to 90".to_string(),
            ));
        }
        if !(-180.0..=180.0).contains(&self.west) || !(-180.0..=180.0).contains(&self.east) {
            return Err(DomainError::ValidationError(
                "region longitude must be -180 to 180".to_string(),
            ));
        }
        if self.south > self.north {
            return Err(DomainError::ValidationError(
                "region south must not exceed north".to_string(),
            ));
        }
        if self.west > self.east {
            return Err(DomainError::ValidationError(
                "region west must not exceed east".to_string(),
            ));
        }
        Ok(())
    }
}
