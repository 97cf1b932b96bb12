//! WMO weather code translation.
//! See: https://open-meteo.com/en/docs#weathervariables

use crate::model::WeatherCodeInfo;

/// Entry returned for codes missing from [`WEATHER_CODES`].
pub const UNKNOWN_WEATHER: WeatherCodeInfo = WeatherCodeInfo {
    text: "Unknown weather",
    emoji: "🤷",
};

/// Every code the forecast provider emits, with the text shown to users.
pub const WEATHER_CODES: &[(i32, WeatherCodeInfo)] = &[
    (0, info("Clear sky", "☀️")),
    (1, info("Mainly clear", "🌤️")),
    (2, info("Partly cloudy", "⛅️")),
    (3, info("Overcast", "☁️")),
    (45, info("Fog", "🌫️")),
    (48, info("Depositing rime fog", "🌫️")),
    (51, info("Light drizzle", "💧")),
    (53, info("Moderate drizzle", "💧")),
    (55, info("Dense drizzle", "💧")),
    (61, info("Slight rain", "🌧️")),
    (63, info("Moderate rain", "🌧️")),
    (65, info("Heavy rain", "🌧️")),
    (66, info("Light freezing rain", "🥶")),
    (67, info("Heavy freezing rain", "🥶")),
    (71, info("Slight snow fall", "❄️")),
    (73, info("Moderate snow fall", "❄️")),
    (75, info("Heavy snow fall", "❄️")),
    (77, info("Snow grains", "❄️")),
    (80, info("Slight rain showers", "🌦️")),
    (81, info("Moderate rain showers", "🌦️")),
    (82, info("Violent rain showers", "🌦️")),
    (85, info("Slight snow showers", "🌨️")),
    (86, info("Heavy snow showers", "🌨️")),
    (95, info("Thunderstorm", "⛈️")),
    (96, info("Thunderstorm with hail", "⛈️")),
    (99, info("Thunderstorm with heavy hail", "⛈️")),
];

const fn info(text: &'static str, emoji: &'static str) -> WeatherCodeInfo {
    WeatherCodeInfo { text, emoji }
}

/// Translate a weather code into its description and glyph. Never fails.
pub fn translate(code: i32) -> WeatherCodeInfo {
    WEATHER_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, info)| *info)
        .unwrap_or(UNKNOWN_WEATHER)
}
