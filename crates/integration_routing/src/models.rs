//! Routing and geocoding data models
//!
//! Validated representations of directions and places as returned by the
//! backends. Construction from raw JSON lives next to each client.

use domain::GeoPoint;
use serde::{Deserialize, Serialize};

/// First candidate route of a directions response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    /// Route length in meters
    pub distance_meters: f64,
    /// Route duration in seconds
    pub duration_seconds: f64,
    /// Route polyline, at least two points
    pub coordinates: Vec<GeoPoint>,
    /// Backend segments (one per leg between way points)
    pub segments: Vec<DirectionsSegment>,
}

impl Directions {
    /// Points spanned by one step, from its start index to its end index
    ///
    /// Steps whose indices fall outside the polyline cover no points.
    #[must_use]
    pub fn step_geometry(&self, step: &DirectionsStep) -> Vec<GeoPoint> {
        if step.start_index <= step.end_index && step.end_index < self.coordinates.len() {
            self.coordinates[step.start_index..=step.end_index].to_vec()
        } else {
            Vec::new()
        }
    }
}

/// A leg of a directions response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsSegment {
    /// Length in meters
    pub distance: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Instruction steps
    pub steps: Vec<DirectionsStep>,
}

/// A single maneuver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsStep {
    /// Human-readable instruction
    pub instruction: String,
    /// Length in meters
    pub distance: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Index of the first polyline point of this step
    pub start_index: usize,
    /// Index of the last polyline point of this step
    pub end_index: usize,
}

/// Address components of a place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceAddress {
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    /// City, town or village, whichever the backend supplied
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

/// A geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Full formatted name
    pub display_name: String,
    /// Structured address
    pub address: PlaceAddress,
    /// Backend place identifier
    pub place_id: u64,
    /// Relevance score (0 to 1)
    pub importance: f64,
    /// Place type, e.g. `mall` or `residential`
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions() -> Directions {
        Directions {
            distance_meters: 300.0,
            duration_seconds: 60.0,
            coordinates: vec![
                GeoPoint::new_unchecked(12.0, 77.0),
                GeoPoint::new_unchecked(12.1, 77.1),
                GeoPoint::new_unchecked(12.2, 77.2),
                GeoPoint::new_unchecked(12.3, 77.3),
            ],
            segments: Vec::new(),
        }
    }

    fn step(start_index: usize, end_index: usize) -> DirectionsStep {
        DirectionsStep {
            instruction: "Continue".to_string(),
            distance: 100.0,
            duration: 20.0,
            start_index,
            end_index,
        }
    }

    #[test]
    fn test_step_geometry_is_own_slice() {
        let geometry = directions().step_geometry(&step(1, 2));
        assert_eq!(geometry.len(), 2);
        assert!((geometry[0].lat() - 12.1).abs() < f64::EPSILON);
        assert!((geometry[1].lat() - 12.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_step_geometry_single_point() {
        assert_eq!(directions().step_geometry(&step(3, 3)).len(), 1);
    }

    #[test]
    fn test_step_geometry_out_of_range_is_empty() {
        assert!(directions().step_geometry(&step(2, 4)).is_empty());
        assert!(directions().step_geometry(&step(2, 1)).is_empty());
    }
}
