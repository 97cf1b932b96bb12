use thiserror::Error;

/// Failure kinds surfaced by the pipeline.
///
/// Provider failures keep their full `anyhow` chain (transport error, status line,
/// decode error) so callers can log the detail and show [`WeatherError::user_message`].
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No location found for '{0}'")]
    GeocodeNotFound(String),

    #[error("Location lookup failed: {0:#}")]
    LocationLookup(anyhow::Error),

    #[error("Forecast fetch failed: {0:#}")]
    ForecastFetch(anyhow::Error),
}

impl WeatherError {
    /// Short diagnostic suitable for an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::GeocodeNotFound(name) => format!("Could not find a place called '{name}'."),
            Self::LocationLookup(_) => {
                "Could not determine the place name. Please try again later.".to_string()
            }
            Self::ForecastFetch(_) => {
                "Could not fetch weather data. Please try again later.".to_string()
            }
        }
    }

    /// Whether the failure means "no such place" rather than a provider problem.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GeocodeNotFound(_))
    }
}
