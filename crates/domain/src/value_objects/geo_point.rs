//! Geographic point value object and great-circle math

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Mean Earth radius used by the haversine formula, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A WGS84 coordinate in degrees
///
/// Deserialization goes through [`GeoPoint::new`], so out-of-range input is
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to 90)
    lat: f64,
    /// Longitude in degrees (-180 to 180)
    lng: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = DomainError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Create a new point with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if latitude is not in [-90, 90]
    /// or longitude is not in [-180, 180]
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !is_valid_coordinate(lat, lng) {
            return Err(DomainError::InvalidCoordinates { lat, lng });
        }
        Ok(Self { lat, lng })
    }

    /// Create a point without validation (for trusted sources)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Get the latitude
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Get the longitude
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to another point in meters
    #[must_use]
    pub fn distance_meters(&self, other: &Self) -> f64 {
        haversine_distance(*self, *other)
    }

    /// Great-circle distance to another point in kilometers
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        self.distance_meters(other) / 1000.0
    }

    /// Format as the `"lng,lat"` pair expected by routing backends
    #[must_use]
    pub fn to_lng_lat(&self) -> String {
        format!("{},{}", self.lng, self.lat)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Check that a latitude/longitude pair is inside the WGS84 range
#[must_use]
pub fn is_valid_coordinate(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Haversine great-circle distance between two points in meters
///
/// Symmetric, zero for identical points.
#[must_use]
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lng / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn majestic() -> GeoPoint {
        GeoPoint::new_unchecked(12.9767, 77.5713)
    }

    fn whitefield() -> GeoPoint {
        GeoPoint::new_unchecked(12.9698, 77.7500)
    }

    #[test]
    fn test_valid_coordinates() {
        let point = GeoPoint::new(12.9716, 77.5946).expect("valid coordinates");
        assert!((point.lat() - 12.9716).abs() < f64::EPSILON);
        assert!((point.lng() - 77.5946).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = majestic();
        assert!(p.distance_meters(&p).abs() < f64::EPSILON);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = majestic();
        let b = whitefield();
        assert!((a.distance_meters(&b) - b.distance_meters(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_majestic_whitefield() {
        // Roughly 19.4 km as the crow flies
        let d = majestic().distance_km(&whitefield());
        assert!((d - 19.4).abs() < 0.5, "got {d}");
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new_unchecked(0.0, 0.0);
        let b = GeoPoint::new_unchecked(1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((a.distance_meters(&b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_lng_lat_format() {
        let p = GeoPoint::new_unchecked(12.5, 77.25);
        assert_eq!(p.to_lng_lat(), "77.25,12.5");
    }

    #[test]
    fn test_display() {
        let display = format!("{}", majestic());
        assert_eq!(display, "12.976700, 77.571300");
    }

    #[test]
    fn test_serialization_field_names() {
        let json = serde_json::to_string(&majestic()).expect("serialize");
        assert!(json.contains("\"lat\""));
        assert!(json.contains("\"lng\""));
    }

    #[test]
    fn test_deserialize_validates_range() {
        let point: GeoPoint = serde_json::from_str(r#"{"lat": 12.97, "lng": 77.59}"#).unwrap();
        assert_eq!(point, GeoPoint::new(12.97, 77.59).unwrap());

        assert!(serde_json::from_str::<GeoPoint>(r#"{"lat": 91.0, "lng": 77.59}"#).is_err());
        assert!(serde_json::from_str::<GeoPoint>(r#"{"lat": 12.97, "lng": -181.0}"#).is_err());
    }
}
