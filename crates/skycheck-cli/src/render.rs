use skycheck_weather::CurrentWeather;

use crate::session::ResolvedLocation;

pub const HEADER: [&str; 3] = ["//////////////////", "Skycheck Weather", "//////////////////"];

/// Lines describing `weather` at `location`.
pub fn weather_lines(location: &ResolvedLocation, weather: &CurrentWeather) -> Vec<String> {
    let deg = weather.unit.symbol();
    let conditions = match &weather.summary {
        Some(summary) => format!("{} ({})", weather.condition.description(), summary),
        None => weather.condition.description().to_string(),
    };

    let mut lines = vec![format!("Weather for {}:", location.label()), String::new()];
    if let Some(place) = &weather.place {
        lines.push(format!("  Reported at: {}", place));
    }
    lines.extend([
        format!("  Conditions:  {}", conditions),
        format!(
            "  Temperature: {:.1}{} (feels like {:.1}{})",
            weather.temperature, deg, weather.feels_like, deg
        ),
        format!(
            "  Low / High:  {:.1}{} / {:.1}{}",
            weather.temp_min, deg, weather.temp_max, deg
        ),
        format!("  Humidity:    {}%", weather.humidity),
        format!("  Pressure:    {} hPa", weather.pressure_hpa),
        format!(
            "  Wind:        {:.1} {}",
            weather.wind_speed,
            weather.unit.speed_unit()
        ),
    ]);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycheck_weather::{TemperatureUnit, WeatherCondition};

    fn sample_weather() -> CurrentWeather {
        CurrentWeather {
            temperature: 54.26,
            feels_like: 52.1,
            temp_min: 50.0,
            temp_max: 58.6,
            humidity: 71,
            pressure_hpa: 1015,
            wind_speed: 8.05,
            condition: WeatherCondition::Cloudy,
            summary: Some("overcast clouds".into()),
            place: None,
            unit: TemperatureUnit::Fahrenheit,
        }
    }

    #[test]
    fn test_zip_heading() {
        let lines = weather_lines(&ResolvedLocation::Zip(10001), &sample_weather());
        assert_eq!(lines[0], "Weather for area code 10001:");
    }

    #[test]
    fn test_weather_fields() {
        let lines = weather_lines(&ResolvedLocation::Zip(10001), &sample_weather());
        assert!(lines.contains(&"  Conditions:  Cloudy (overcast clouds)".to_string()));
        assert!(lines.contains(&"  Temperature: 54.3°F (feels like 52.1°F)".to_string()));
        assert!(lines.contains(&"  Humidity:    71%".to_string()));
        assert!(lines.contains(&"  Wind:        8.1 mph".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("  Reported at:")));
    }

    #[test]
    fn test_reported_place() {
        let mut weather = sample_weather();
        weather.place = Some("Boston".into());
        let lines = weather_lines(&ResolvedLocation::Zip(2134), &weather);
        assert_eq!(lines[2], "  Reported at: Boston");
    }
}
