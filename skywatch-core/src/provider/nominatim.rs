//! Geocoding via Nominatim (OpenStreetMap). Free, no API key required.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use crate::{WeatherError, http, location::Address, model::Coordinates};

use super::Geocoder;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            base_url: NOMINATIM_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn new_with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_search(&self, name: &str) -> Result<Vec<Coordinates>> {
        let url = format!("{}/search", self.base_url);
        let places: Vec<NmPlace> = http::get_json(
            &self.http,
            &url,
            &[
                ("city", name.to_string()),
                ("format", "json".to_string()),
                ("limit", "1".to_string()),
            ],
            "Nominatim search",
        )
        .await?;

        Ok(places
            .into_iter()
            .map(|p| Coordinates::new(p.lat, p.lon))
            .collect())
    }

    async fn fetch_reverse(&self, coords: Coordinates) -> Result<Address> {
        let url = format!("{}/reverse", self.base_url);
        let body: NmReverse = http::get_json(
            &self.http,
            &url,
            &[
                ("format", "jsonv2".to_string()),
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
            ],
            "Nominatim reverse",
        )
        .await?;

        if let Some(error) = &body.error {
            tracing::debug!(%coords, %error, "Reverse geocode returned no address");
        }

        Ok(body.address.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    #[serde(deserialize_with = "number_or_string")]
    lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct NmReverse {
    address: Option<Address>,
    error: Option<String>,
}

/// Nominatim encodes coordinates as strings ("48.8566"); accept plain numbers too.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, name: &str) -> Result<Vec<Coordinates>, WeatherError> {
        self.fetch_search(name)
            .await
            .map_err(WeatherError::LocationLookup)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Address, WeatherError> {
        self.fetch_reverse(coords)
            .await
            .map_err(WeatherError::LocationLookup)
    }
}
