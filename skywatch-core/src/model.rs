use serde::{Deserialize, Serialize};

/// Canonical coordinates used for every provider call of one request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Display name of a resolved place. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
}

/// Human-readable description of a weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeatherCodeInfo {
    pub text: &'static str,
    pub emoji: &'static str,
}

/// Current conditions, rounded to whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// °C
    pub temperature: i64,
    pub weather_code: i32,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// km/h
    pub wind_speed: i64,
    /// °C
    pub feels_like: i64,
    pub uv_index: i64,
    /// hPa
    pub pressure: i64,
    /// °C
    pub dew_point: i64,
    /// km
    pub visibility: i64,
    /// Local ISO-8601 timestamp of today's sunrise, absent when the daily series is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecastEntry {
    /// Local hour label, e.g. "3 PM".
    pub time: String,
    pub temp: i64,
    pub weather_code: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecastEntry {
    /// Weekday name, e.g. "Monday".
    pub day: String,
    pub temp_min: i64,
    pub temp_max: i64,
    pub weather_code: i32,
}

/// Everything presentation code needs for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub snapshot: WeatherSnapshot,
    pub location: LocationInfo,
    /// Up to 24 entries starting at the caller's current hour. May be shorter.
    pub hourly: Vec<HourlyForecastEntry>,
    /// One entry per provider day, today first.
    pub weekly: Vec<DailyForecastEntry>,
}
