//! Core library for SkyWatch.
//!
//! This crate turns coordinates or a city name into a display-ready weather report:
//! - Location resolution (forward and reverse geocoding)
//! - One-call forecast fetching
//! - Normalization into a stable, rounded data model
//! - Weather code translation
//!
//! It is used by `skywatch-cli`, but holds no configuration and writes no files, so
//! any front end can drive it.

pub mod aggregate;
pub mod codes;
pub mod error;
pub mod http;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod raw;

pub use aggregate::{Aggregator, CityWeather, Clock, FixedClock, SystemClock};
pub use codes::translate;
pub use error::WeatherError;
pub use location::{Address, resolve_from_coordinates, resolve_from_name};
pub use model::{
    AggregateResult, Coordinates, DailyForecastEntry, HourlyForecastEntry, LocationInfo,
    WeatherCodeInfo, WeatherSnapshot,
};
pub use normalize::normalize;
pub use provider::{ForecastSource, Geocoder};
pub use raw::RawForecast;
