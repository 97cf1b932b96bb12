use async_trait::async_trait;
use std::fmt::Debug;

use crate::{WeatherError, location::Address, model::Coordinates, raw::RawForecast};

pub mod nominatim;
pub mod openmeteo;

/// Forward and reverse geocoding.
///
/// Implementations map every failure to [`WeatherError::LocationLookup`]; they do not
/// retry and do not cache.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Candidate coordinates for a free-text place name, best match first.
    /// An empty vector means the provider knows no such place.
    async fn search(&self, name: &str) -> Result<Vec<Coordinates>, WeatherError>;

    /// Address breakdown for a point. Fields the provider omits stay `None`.
    async fn reverse(&self, coords: Coordinates) -> Result<Address, WeatherError>;
}

/// Current, hourly and daily forecast for a point in one round trip.
///
/// Implementations map every failure to [`WeatherError::ForecastFetch`].
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<RawForecast, WeatherError>;
}
