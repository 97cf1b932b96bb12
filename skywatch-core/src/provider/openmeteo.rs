//! Forecasts via Open-Meteo. Free, no API key required.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use crate::{WeatherError, http, model::Coordinates, raw::RawForecast};

use super::ForecastSource;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1";

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m,uv_index,surface_pressure,dew_point_2m,visibility";
const HOURLY_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,sunrise,sunset";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
}

impl OpenMeteoClient {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: OPEN_METEO_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    async fn fetch(&self, coords: Coordinates) -> Result<RawForecast> {
        let url = format!("{}/forecast", self.base_url);

        // timezone=auto makes every timestamp local to the forecast point
        http::get_json(
            &self.http,
            &url,
            &[
                ("latitude", coords.latitude.to_string()),
                ("longitude", coords.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ],
            "Open-Meteo forecast",
        )
        .await
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn fetch_forecast(&self, coords: Coordinates) -> Result<RawForecast, WeatherError> {
        self.fetch(coords).await.map_err(WeatherError::ForecastFetch)
    }
}
