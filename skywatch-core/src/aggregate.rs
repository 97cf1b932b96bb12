//! Entry points used by presentation code.

use chrono::Timelike;
use serde::Serialize;
use std::{fmt::Debug, sync::Arc};

use crate::{
    WeatherError, http,
    location::{resolve_from_coordinates, resolve_from_name},
    model::{AggregateResult, Coordinates},
    normalize::normalize,
    provider::{
        ForecastSource, Geocoder, nominatim::NominatimGeocoder, openmeteo::OpenMeteoClient,
    },
};

/// Source of the caller's current local hour (0-23).
pub trait Clock: Send + Sync + Debug {
    fn local_hour(&self) -> u32;
}

/// Reads the hour from the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn local_hour(&self) -> u32 {
        self.0
    }
}

/// Outcome of one city in [`Aggregator::by_city_names`].
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CityWeather {
    Ready {
        city: String,
        weather: Box<AggregateResult>,
    },
    Unavailable {
        city: String,
        reason: String,
    },
}

impl CityWeather {
    pub fn city(&self) -> &str {
        match self {
            Self::Ready { city, .. } | Self::Unavailable { city, .. } => city,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// Resolves a place, fetches its forecast and normalizes both.
///
/// Cheap to clone; every request builds its data from scratch. No retries, no caching.
#[derive(Debug, Clone)]
pub struct Aggregator {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
}

impl Aggregator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecasts: Arc<dyn ForecastSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            geocoder,
            forecasts,
            clock,
        }
    }

    /// Nominatim for geocoding, Open-Meteo for forecasts, the system clock for the hour.
    pub fn with_default_providers() -> anyhow::Result<Self> {
        let http = http::client()?;

        Ok(Self::new(
            Arc::new(NominatimGeocoder::new(http.clone())),
            Arc::new(OpenMeteoClient::new(http)),
            Arc::new(SystemClock),
        ))
    }

    /// Weather for a point. Forecast and place name are fetched concurrently; either
    /// failure fails the whole request.
    pub async fn by_coordinates(
        &self,
        coords: Coordinates,
    ) -> Result<AggregateResult, WeatherError> {
        let hour = self.clock.local_hour();
        tracing::info!(%coords, hour, "Aggregating weather by coordinates");
        self.aggregate(coords, hour).await
    }

    /// Weather for a named place. The name is geocoded first (first match wins), then
    /// the display name comes from reverse geocoding the resolved coordinates.
    pub async fn by_city_name(&self, city: &str) -> Result<AggregateResult, WeatherError> {
        let hour = self.clock.local_hour();
        tracing::info!(%city, hour, "Aggregating weather by city name");

        let coords = resolve_from_name(self.geocoder.as_ref(), city).await?;
        self.aggregate(coords, hour).await
    }

    /// Weather for several places at once. Each city is an independent request;
    /// failures become [`CityWeather::Unavailable`] entries. Results keep input order.
    pub async fn by_city_names<S: AsRef<str>>(&self, cities: &[S]) -> Vec<CityWeather> {
        let handles: Vec<_> = cities
            .iter()
            .map(|city| {
                let city = city.as_ref().to_string();
                let this = self.clone();
                let handle = tokio::spawn({
                    let city = city.clone();
                    async move { this.by_city_name(&city).await }
                });
                (city, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (city, handle) in handles {
            let entry = match handle.await {
                Ok(Ok(weather)) => CityWeather::Ready {
                    city,
                    weather: Box::new(weather),
                },
                Ok(Err(err)) => {
                    tracing::warn!(%city, error = %err, "City weather unavailable");
                    CityWeather::Unavailable {
                        city,
                        reason: err.user_message(),
                    }
                }
                Err(join_err) => {
                    tracing::warn!(%city, error = %join_err, "City weather task did not complete");
                    CityWeather::Unavailable {
                        city,
                        reason: join_err.to_string(),
                    }
                }
            };
            results.push(entry);
        }

        results
    }

    /// `hour` is the local hour at the start of the request, not after the calls return.
    async fn aggregate(
        &self,
        coords: Coordinates,
        hour: u32,
    ) -> Result<AggregateResult, WeatherError> {
        let (forecast, location) = tokio::try_join!(
            self.forecasts.fetch_forecast(coords),
            resolve_from_coordinates(self.geocoder.as_ref(), coords)
        )?;

        Ok(normalize(&forecast, &location, hour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{location::Address, raw::RawForecast};
    use async_trait::async_trait;
    use serde_json::json;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicU32, AtomicUsize, Ordering},
        time::Duration,
    };
    use tokio::sync::Barrier;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn forecast_json(temperature: f64, code: i32) -> serde_json::Value {
        let time: Vec<String> = (0..48)
            .map(|i| format!("2024-05-{:02}T{:02}:00", 1 + i / 24, i % 24))
            .collect();
        json!({
            "current": {
                "temperature_2m": temperature,
                "relative_humidity_2m": 71,
                "apparent_temperature": 17.6,
                "weather_code": code,
                "wind_speed_10m": 9.7,
                "uv_index": 3.1,
                "surface_pressure": 1009.8,
                "dew_point_2m": 12.9,
                "visibility": 8700.0
            },
            "hourly": {
                "time": time,
                "temperature_2m": vec![15.0; 48],
                "weather_code": vec![code; 48]
            },
            "daily": {
                "time": ["2024-05-01", "2024-05-02"],
                "temperature_2m_min": [11.2, 10.4],
                "temperature_2m_max": [19.6, 21.5],
                "weather_code": [code, 61],
                "sunrise": ["2024-05-01T06:32", "2024-05-02T06:30"],
                "sunset": ["2024-05-01T21:03", "2024-05-02T21:05"]
            }
        })
    }

    #[derive(Debug, Default)]
    struct StubGeocoder {
        places: HashMap<String, Coordinates>,
        town: Option<String>,
        fail_reverse: bool,
        searches: AtomicUsize,
        reverses: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn search(&self, name: &str) -> Result<Vec<Coordinates>, WeatherError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            if name == "Brokenville" {
                return Err(WeatherError::LocationLookup(anyhow::anyhow!("status 500")));
            }
            Ok(self.places.get(name).copied().into_iter().collect())
        }

        async fn reverse(&self, _coords: Coordinates) -> Result<Address, WeatherError> {
            self.reverses.fetch_add(1, Ordering::SeqCst);
            if self.fail_reverse {
                return Err(WeatherError::LocationLookup(anyhow::anyhow!("status 429")));
            }
            Ok(Address {
                town: self.town.clone(),
                ..Address::default()
            })
        }
    }

    #[derive(Debug, Default)]
    struct StubForecasts {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ForecastSource for StubForecasts {
        async fn fetch_forecast(&self, _coords: Coordinates) -> Result<RawForecast, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WeatherError::ForecastFetch(anyhow::anyhow!("status 502")));
            }
            Ok(serde_json::from_value(forecast_json(18.2, 3)).unwrap())
        }
    }

    fn aggregator(geocoder: Arc<StubGeocoder>, forecasts: Arc<StubForecasts>) -> Aggregator {
        Aggregator::new(geocoder, forecasts, Arc::new(FixedClock(20)))
    }

    fn cities() -> HashMap<String, Coordinates> {
        [
            ("Paris", Coordinates::new(48.85, 2.35)),
            ("Berlin", Coordinates::new(52.52, 13.41)),
            ("Madrid", Coordinates::new(40.42, -3.70)),
        ]
        .into_iter()
        .map(|(name, coords)| (name.to_string(), coords))
        .collect()
    }

    #[tokio::test]
    async fn by_coordinates_merges_forecast_and_place() {
        let geocoder = Arc::new(StubGeocoder {
            town: Some("Springfield".into()),
            ..StubGeocoder::default()
        });
        let forecasts = Arc::new(StubForecasts::default());
        let agg = aggregator(geocoder.clone(), forecasts.clone());

        let result = agg.by_coordinates(Coordinates::new(37.2, -93.3)).await.unwrap();

        assert_eq!(result.location.name, "Springfield");
        assert_eq!(result.snapshot.temperature, 18);
        assert_eq!(result.snapshot.visibility, 8);
        assert_eq!(result.hourly.len(), 24);
        assert_eq!(result.hourly[0].time, "8 PM");
        assert_eq!(result.weekly.len(), 2);
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.reverses.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.searches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn by_coordinates_fails_when_place_lookup_fails() {
        let geocoder = Arc::new(StubGeocoder {
            fail_reverse: true,
            ..StubGeocoder::default()
        });
        let agg = aggregator(geocoder, Arc::new(StubForecasts::default()));

        let err = agg.by_coordinates(Coordinates::new(1.0, 2.0)).await.unwrap_err();
        assert!(matches!(err, WeatherError::LocationLookup(_)));
    }

    #[tokio::test]
    async fn by_coordinates_fails_when_forecast_fails() {
        let forecasts = Arc::new(StubForecasts {
            fail: true,
            ..StubForecasts::default()
        });
        let agg = aggregator(Arc::new(StubGeocoder::default()), forecasts);

        let err = agg.by_coordinates(Coordinates::new(1.0, 2.0)).await.unwrap_err();
        assert!(matches!(err, WeatherError::ForecastFetch(_)));
    }

    /// Both stubs wait for each other, so they only return if both are in flight.
    #[derive(Debug)]
    struct Rendezvous(Arc<Barrier>);

    #[async_trait]
    impl Geocoder for Rendezvous {
        async fn search(&self, _name: &str) -> Result<Vec<Coordinates>, WeatherError> {
            Ok(vec![Coordinates::new(48.85, 2.35)])
        }

        async fn reverse(&self, _coords: Coordinates) -> Result<Address, WeatherError> {
            self.0.wait().await;
            Ok(Address {
                city: Some("Paris".into()),
                ..Address::default()
            })
        }
    }

    #[async_trait]
    impl ForecastSource for Rendezvous {
        async fn fetch_forecast(&self, _coords: Coordinates) -> Result<RawForecast, WeatherError> {
            self.0.wait().await;
            Ok(serde_json::from_value(forecast_json(18.2, 3)).unwrap())
        }
    }

    #[tokio::test]
    async fn by_coordinates_runs_forecast_and_place_lookup_concurrently() {
        let barrier = Arc::new(Barrier::new(2));
        let agg = Aggregator::new(
            Arc::new(Rendezvous(barrier.clone())),
            Arc::new(Rendezvous(barrier)),
            Arc::new(FixedClock(0)),
        );

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            agg.by_coordinates(Coordinates::new(48.85, 2.35)),
        )
        .await
        .expect("forecast and place lookup must be in flight together")
        .unwrap();

        assert_eq!(result.location.name, "Paris");
        assert_eq!(result.snapshot.temperature, 18);
    }

    /// Clock whose hour moves forward while the forecast is being fetched.
    #[derive(Debug)]
    struct ManualClock(AtomicU32);

    impl Clock for ManualClock {
        fn local_hour(&self) -> u32 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[derive(Debug)]
    struct HourTurningForecasts(Arc<ManualClock>);

    #[async_trait]
    impl ForecastSource for HourTurningForecasts {
        async fn fetch_forecast(&self, _coords: Coordinates) -> Result<RawForecast, WeatherError> {
            self.0.0.store(21, Ordering::SeqCst);
            Ok(serde_json::from_value(forecast_json(18.2, 3)).unwrap())
        }
    }

    #[tokio::test]
    async fn hourly_window_uses_hour_at_request_start() {
        let clock = Arc::new(ManualClock(AtomicU32::new(20)));
        let geocoder = Arc::new(StubGeocoder {
            places: cities(),
            town: Some("Paris".into()),
            ..StubGeocoder::default()
        });
        let agg = Aggregator::new(
            geocoder,
            Arc::new(HourTurningForecasts(clock.clone())),
            clock.clone(),
        );

        let result = agg.by_city_name("Paris").await.unwrap();
        assert_eq!(result.hourly[0].time, "8 PM");

        let result = agg.by_coordinates(Coordinates::new(48.85, 2.35)).await.unwrap();
        assert_eq!(result.hourly[0].time, "9 PM");
        assert_eq!(clock.local_hour(), 21);
    }

    #[tokio::test]
    async fn by_city_name_not_found_skips_forecast() {
        let geocoder = Arc::new(StubGeocoder {
            places: cities(),
            ..StubGeocoder::default()
        });
        let forecasts = Arc::new(StubForecasts::default());
        let agg = aggregator(geocoder.clone(), forecasts.clone());

        let err = agg.by_city_name("Zzzznotacity").await.unwrap_err();

        assert!(matches!(err, WeatherError::GeocodeNotFound(_)));
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 0);
        assert_eq!(geocoder.reverses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn batch_keeps_going_past_failures() {
        let geocoder = Arc::new(StubGeocoder {
            places: cities(),
            town: Some("Somewhere".into()),
            ..StubGeocoder::default()
        });
        let forecasts = Arc::new(StubForecasts::default());
        let agg = aggregator(geocoder, forecasts.clone());

        let results = agg
            .by_city_names(&["Paris", "Brokenville", "Berlin", "Madrid"])
            .await;

        assert_eq!(results.len(), 4);
        let ready: Vec<&str> = results.iter().filter(|r| r.is_ready()).map(|r| r.city()).collect();
        assert_eq!(ready, ["Paris", "Berlin", "Madrid"]);

        match &results[1] {
            CityWeather::Unavailable { city, reason } => {
                assert_eq!(city, "Brokenville");
                assert!(reason.contains("place name"));
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
        assert_eq!(forecasts.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn batch_of_nothing_is_empty() {
        let agg = aggregator(
            Arc::new(StubGeocoder::default()),
            Arc::new(StubForecasts::default()),
        );
        let results = agg.by_city_names::<&str>(&[]).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn paris_end_to_end_over_http() {
        let geo_server = MockServer::start().await;
        let meteo_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("city", "Paris"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "lat": 48.85, "lon": 2.35 }])),
            )
            .expect(1)
            .mount(&geo_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "48.85"))
            .and(query_param("lon", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": { "city": "Paris", "state": "Île-de-France", "country": "France" }
            })))
            .expect(1)
            .mount(&geo_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("latitude", "48.85"))
            .and(query_param("longitude", "2.35"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(18.2, 3)))
            .expect(1)
            .mount(&meteo_server)
            .await;

        let http = http::client().unwrap();
        let agg = Aggregator::new(
            Arc::new(NominatimGeocoder::new_with_base_url(http.clone(), &geo_server.uri())),
            Arc::new(OpenMeteoClient::new_with_base_url(http, &meteo_server.uri())),
            Arc::new(FixedClock(9)),
        );

        let result = agg.by_city_name("Paris").await.unwrap();

        assert_eq!(result.snapshot.temperature, 18);
        assert_eq!(result.snapshot.weather_code, 3);
        assert_eq!(result.location.name, "Paris");
        assert_eq!(result.hourly[0].time, "9 AM");
        assert_eq!(result.weekly[0].day, "Wednesday");
        assert_eq!(result.weekly[1].temp_max, 22);
    }

    #[tokio::test]
    async fn unknown_city_over_http_never_calls_forecast() {
        let geo_server = MockServer::start().await;
        let meteo_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&geo_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "address": {} })))
            .expect(0)
            .mount(&geo_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json(18.2, 3)))
            .expect(0)
            .mount(&meteo_server)
            .await;

        let http = http::client().unwrap();
        let agg = Aggregator::new(
            Arc::new(NominatimGeocoder::new_with_base_url(http.clone(), &geo_server.uri())),
            Arc::new(OpenMeteoClient::new_with_base_url(http, &meteo_server.uri())),
            Arc::new(FixedClock(0)),
        );

        let err = agg.by_city_name("Zzzznotacity").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
