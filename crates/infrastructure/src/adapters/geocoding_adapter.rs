//! Geocoding adapter - Implements GeocodingPort using integration_routing

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::{GeocodeQuery, GeocodingPort};
use async_trait::async_trait;
use domain::{Address, GeoPoint, GeocodeResult, ReverseGeocodeResult};
use integration_routing::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, Place,
    PlaceAddress, SearchRequest,
};
use tracing::{debug, instrument};

/// Adapter for address resolution over a Nominatim-style API
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter").finish_non_exhaustive()
    }
}

impl GeocodingAdapter {
    /// Create a new geocoding adapter around a client
    pub fn new(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }

    /// Create an adapter backed by a Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config).map_err(map_geocoding_error)?;
        Ok(Self::new(Arc::new(client)))
    }

    fn convert_address(address: PlaceAddress) -> Address {
        Address {
            house_number: address.house_number,
            road: address.road,
            neighbourhood: address.neighbourhood,
            suburb: address.suburb,
            city: address.city,
            state: address.state,
            postcode: address.postcode,
            country: address.country,
        }
    }

    fn convert_place(place: Place) -> GeocodeResult {
        GeocodeResult {
            lat: place.latitude,
            lng: place.longitude,
            display_name: place.display_name,
            address: Self::convert_address(place.address),
            place_id: place.place_id,
            importance: place.importance,
            category: place.kind,
        }
    }
}

fn map_geocoding_error(error: GeocodingError) -> ApplicationError {
    match error {
        GeocodingError::AddressNotFound(_) => ApplicationError::EmptyResult(error.to_string()),
        GeocodingError::RateLimitExceeded => ApplicationError::RateLimited,
        GeocodingError::ConnectionFailed(_)
        | GeocodingError::RequestFailed(_)
        | GeocodingError::ParseError(_)
        | GeocodingError::Timeout => ApplicationError::ExternalService(error.to_string()),
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self), fields(text = %query.text))]
    async fn search(&self, query: &GeocodeQuery) -> Result<Vec<GeocodeResult>, ApplicationError> {
        let request = SearchRequest {
            query: query.text.clone(),
            limit: query.limit,
            viewbox: query.viewbox,
            bounded: query.bounded,
        };

        let places = self
            .client
            .search(&request)
            .await
            .map_err(map_geocoding_error)?;

        debug!(count = places.len(), "Places found");
        Ok(places.into_iter().map(Self::convert_place).collect())
    }

    #[instrument(skip(self))]
    async fn reverse(&self, point: GeoPoint) -> Result<ReverseGeocodeResult, ApplicationError> {
        let place = self
            .client
            .reverse(point.lat(), point.lng())
            .await
            .map_err(map_geocoding_error)?;

        Ok(ReverseGeocodeResult {
            display_name: place.display_name,
            address: Self::convert_address(place.address),
        })
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}
