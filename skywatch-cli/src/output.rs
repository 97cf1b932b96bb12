use skywatch_core::{AggregateResult, CityWeather, translate};

/// Formats one aggregate result into a human-readable report.
pub fn format_report(result: &AggregateResult) -> String {
    let snap = &result.snapshot;
    let now = translate(snap.weather_code);

    let mut lines = vec![
        result.location.name.clone(),
        format!(
            "{} {}, {}\u{00b0}C (feels like {}\u{00b0}C)",
            now.emoji, now.text, snap.temperature, snap.feels_like
        ),
        String::new(),
        format!("  Humidity:   {}%", snap.humidity),
        format!("  Wind:       {} km/h", snap.wind_speed),
        format!("  UV index:   {}", snap.uv_index),
        format!("  Pressure:   {} hPa", snap.pressure),
        format!("  Dew point:  {}\u{00b0}C", snap.dew_point),
        format!("  Visibility: {} km", snap.visibility),
        format!("  Sunrise:    {}", time_of_day(snap.sunrise.as_deref())),
        format!("  Sunset:     {}", time_of_day(snap.sunset.as_deref())),
    ];

    if !result.hourly.is_empty() {
        lines.push(String::new());
        lines.push("Next hours:".to_string());
        lines.extend(result.hourly.iter().map(|hour| {
            let info = translate(hour.weather_code);
            format!(
                "  {:>5}  {:>4}\u{00b0}C  {} {}",
                hour.time, hour.temp, info.emoji, info.text
            )
        }));
    }

    if !result.weekly.is_empty() {
        lines.push(String::new());
        lines.push("This week:".to_string());
        lines.extend(result.weekly.iter().map(|day| {
            let info = translate(day.weather_code);
            format!(
                "  {:<9}  {:>4}\u{00b0}C / {:>4}\u{00b0}C  {} {}",
                day.day, day.temp_min, day.temp_max, info.emoji, info.text
            )
        }));
    }

    lines.join("\n") + "\n"
}

/// One line per city; failed cities get a placeholder instead of a report.
pub fn format_batch(entries: &[CityWeather]) -> String {
    entries
        .iter()
        .map(|entry| match entry {
            CityWeather::Ready { city, weather } => {
                let info = translate(weather.snapshot.weather_code);
                format!(
                    "{:<20} {:>4}\u{00b0}C  {} {} ({})\n",
                    city, weather.snapshot.temperature, info.emoji, info.text, weather.location.name
                )
            }
            CityWeather::Unavailable { city, reason } => {
                format!("{:<20}    --   unavailable: {}\n", city, reason)
            }
        })
        .collect()
}

/// "2024-05-01T06:32" -> "06:32"; absent means unknown.
fn time_of_day(timestamp: Option<&str>) -> &str {
    match timestamp {
        Some(ts) => ts.split_once('T').map_or(ts, |(_, time)| time),
        None => "unknown",
    }
}
