//! Upstream forecast payload, decoded at the provider boundary.
//!
//! Only the fields the pipeline reads are modelled. `current` and its weather code are
//! required; a payload without them is rejected as malformed. Missing `hourly`/`daily`
//! blocks decode as empty series, and `null` readings or samples decode as `None`, so
//! the normalizer can degrade instead of failing.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawForecast {
    pub current: RawCurrent,
    #[serde(default)]
    pub hourly: RawHourly,
    #[serde(default)]
    pub daily: RawDaily,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCurrent {
    pub weather_code: i32,
    #[serde(default)]
    pub temperature_2m: Option<f64>,
    #[serde(default)]
    pub relative_humidity_2m: Option<f64>,
    #[serde(default)]
    pub apparent_temperature: Option<f64>,
    /// km/h
    #[serde(default)]
    pub wind_speed_10m: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
    /// hPa
    #[serde(default)]
    pub surface_pressure: Option<f64>,
    #[serde(default)]
    pub dew_point_2m: Option<f64>,
    /// Meters.
    #[serde(default)]
    pub visibility: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawHourly {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawDaily {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub weather_code: Vec<Option<i32>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
}
