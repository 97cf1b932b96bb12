//! Reshape a raw forecast into the display model.
//!
//! Everything here is a pure function of its inputs: no clock reads, no I/O.
//!
//! Gaps in the provider data degrade instead of failing. A missing current reading
//! counts as 0. An hourly or daily sample whose temperature or weather code is `null`
//! is skipped, so the window can hold fewer entries than the series it was cut from.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    model::{
        AggregateResult, DailyForecastEntry, HourlyForecastEntry, LocationInfo, WeatherSnapshot,
    },
    raw::{RawCurrent, RawDaily, RawForecast, RawHourly},
};

/// Number of hourly samples shown from the caller's current hour onwards.
pub const HOURLY_WINDOW: usize = 24;

/// Merge a forecast and a resolved place into an [`AggregateResult`].
///
/// `now_local_hour` is the caller's wall-clock hour. The hourly window starts at that
/// index of the provider series; an index past the end clamps to the end, giving an
/// empty window.
pub fn normalize(
    raw: &RawForecast,
    location: &LocationInfo,
    now_local_hour: u32,
) -> AggregateResult {
    AggregateResult {
        snapshot: snapshot(&raw.current, &raw.daily),
        location: location.clone(),
        hourly: hourly_window(&raw.hourly, now_local_hour as usize),
        weekly: weekly(&raw.daily),
    }
}

fn snapshot(current: &RawCurrent, daily: &RawDaily) -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: reading(current.temperature_2m),
        weather_code: current.weather_code,
        humidity: current
            .relative_humidity_2m
            .unwrap_or_default()
            .round()
            .clamp(0.0, 100.0) as u8,
        wind_speed: reading(current.wind_speed_10m),
        feels_like: reading(current.apparent_temperature),
        uv_index: reading(current.uv_index),
        pressure: reading(current.surface_pressure),
        dew_point: reading(current.dew_point_2m),
        visibility: meters_to_km(current.visibility.unwrap_or_default()),
        sunrise: daily.sunrise.first().cloned().flatten(),
        sunset: daily.sunset.first().cloned().flatten(),
    }
}

fn hourly_window(hourly: &RawHourly, start: usize) -> Vec<HourlyForecastEntry> {
    let start = start.min(hourly.time.len());
    let end = start.saturating_add(HOURLY_WINDOW).min(hourly.time.len());

    hourly.time[start..end]
        .iter()
        .zip(hourly.temperature_2m.iter().skip(start))
        .zip(hourly.weather_code.iter().skip(start))
        .filter_map(|((time, temp), code)| {
            Some(HourlyForecastEntry {
                temp: round((*temp)?),
                weather_code: (*code)?,
                time: hour_label(time),
            })
        })
        .collect()
}

fn weekly(daily: &RawDaily) -> Vec<DailyForecastEntry> {
    daily
        .time
        .iter()
        .zip(&daily.temperature_2m_min)
        .zip(&daily.temperature_2m_max)
        .zip(&daily.weather_code)
        .filter_map(|(((date, min), max), code)| {
            Some(DailyForecastEntry {
                temp_min: round((*min)?),
                temp_max: round((*max)?),
                weather_code: (*code)?,
                day: weekday_name(date),
            })
        })
        .collect()
}

/// Round half away from zero.
fn round(value: f64) -> i64 {
    value.round() as i64
}

fn reading(value: Option<f64>) -> i64 {
    value.map_or(0, round)
}

/// Whole kilometers, truncating.
fn meters_to_km(meters: f64) -> i64 {
    (meters as i64) / 1000
}

/// "2024-05-01T15:00" -> "3 PM". Unparseable input is returned as is.
fn hour_label(timestamp: &str) -> String {
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map(|dt| dt.format("%-I %p").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// "2024-05-01" -> "Wednesday". Unparseable input is returned as is.
fn weekday_name(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%A").to_string())
        .unwrap_or_else(|_| date.to_string())
}
