//! Current-weather lookups against the OpenWeatherMap API.

use crate::types::{CurrentWeather, TemperatureUnit, WeatherCondition, WeatherError, WeatherTarget};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    weather: Vec<OwmCondition>,
    main: OwmMain,
    wind: Option<OwmWind>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    id: i32,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

/// Error body; `cod` is sometimes a number and sometimes a string.
#[derive(Debug, Deserialize)]
struct OwmErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    unit: TemperatureUnit,
}

impl WeatherProvider {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        unit: TemperatureUnit,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            unit,
        })
    }

    /// Fetch current conditions for `target`.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, target: &WeatherTarget) -> Result<CurrentWeather, WeatherError> {
        let mut params: Vec<(&str, String)> = vec![
            ("appid", self.api_key.clone()),
            ("units", self.unit.api_units().to_string()),
        ];
        match target {
            WeatherTarget::Coordinates { lat, lon } => {
                params.push(("lat", lat.to_string()));
                params.push(("lon", lon.to_string()));
            }
            WeatherTarget::Zip(zip) => {
                params.push(("zip", format!("{:05},us", zip)));
            }
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<OwmErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            tracing::debug!("Weather API returned {}: {}", status, message);
            return Err(match status {
                StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
                StatusCode::NOT_FOUND => WeatherError::LocationNotFound(message),
                _ => WeatherError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        Ok(self.to_current(body))
    }

    fn to_current(&self, body: OwmResponse) -> CurrentWeather {
        let primary = body.weather.into_iter().next();
        let condition = primary
            .as_ref()
            .map(|c| WeatherCondition::from_owm_code(c.id))
            .unwrap_or_default();

        CurrentWeather {
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            temp_min: body.main.temp_min,
            temp_max: body.main.temp_max,
            humidity: body.main.humidity.clamp(0.0, 100.0).round() as u8,
            pressure_hpa: body.main.pressure.max(0.0).round() as u32,
            wind_speed: body.wind.map(|w| w.speed).unwrap_or(0.0),
            condition,
            summary: primary.and_then(|c| c.description),
            place: body.name.filter(|n| !n.is_empty()),
            unit: self.unit,
        }
    }
}
