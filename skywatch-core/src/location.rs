//! Location resolution: coordinates to a display name, and place names to coordinates.

use serde::Deserialize;

use crate::{
    WeatherError,
    model::{Coordinates, LocationInfo},
    provider::Geocoder,
};

/// Name shown when the address carries none of the fields in the fallback chain.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

/// Address components returned by reverse geocoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// First non-empty of city, town, village, county; otherwise [`UNKNOWN_LOCATION`].
    pub fn display_name(&self) -> String {
        [&self.city, &self.town, &self.village, &self.county]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string()
    }
}

/// Reverse mode: display name for a point.
pub async fn resolve_from_coordinates(
    geocoder: &dyn Geocoder,
    coords: Coordinates,
) -> Result<LocationInfo, WeatherError> {
    let address = geocoder.reverse(coords).await?;
    let name = address.display_name();

    tracing::debug!(%coords, %name, "Resolved place name");
    Ok(LocationInfo { name })
}

/// Forward mode: coordinates of the first match for `name`.
pub async fn resolve_from_name(
    geocoder: &dyn Geocoder,
    name: &str,
) -> Result<Coordinates, WeatherError> {
    let coords = geocoder
        .search(name)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::GeocodeNotFound(name.to_string()))?;

    tracing::debug!(%name, %coords, "Geocoded place name");
    Ok(coords)
}
