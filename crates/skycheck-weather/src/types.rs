use serde::{Deserialize, Serialize};

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Auto,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    /// Value of the API's `units` query parameter. `Auto` uses imperial.
    pub fn api_units(&self) -> &'static str {
        match self {
            Self::Celsius => "metric",
            Self::Auto | Self::Fahrenheit => "imperial",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Auto | Self::Fahrenheit => "°F",
        }
    }

    pub fn speed_unit(&self) -> &'static str {
        match self {
            Self::Celsius => "m/s",
            Self::Auto | Self::Fahrenheit => "mph",
        }
    }
}

/// Weather condition categories mapped from OpenWeatherMap condition ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert an OpenWeatherMap condition id to WeatherCondition
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_owm_code(code: i32) -> Self {
        match code {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500 | 501 | 520 | 521 => Self::Rain,
            502..=504 | 522 | 531 => Self::HeavyRain,
            511 => Self::Sleet, // Freezing rain
            611..=616 => Self::Sleet,
            600..=699 => Self::Snow,
            700..=799 => Self::Fog,
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }
}

/// What to fetch weather for: a resolved dataset location or a US zip code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherTarget {
    Coordinates { lat: f64, lon: f64 },
    Zip(u32),
}

/// Current weather conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub pressure_hpa: u32,
    pub wind_speed: f64,
    pub condition: WeatherCondition,
    /// Provider's own wording, e.g. "overcast clouds"
    pub summary: Option<String>,
    /// Place name as reported by the provider
    pub place: Option<String>,
    pub unit: TemperatureUnit,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(_) => "Unable to reach the weather service. Check your connection.",
            Self::MissingApiKey => {
                "WEATHER_API_KEY is not set. Add it to your environment or .env file."
            }
            Self::InvalidApiKey => "Weather API key is invalid. Check WEATHER_API_KEY.",
            Self::LocationNotFound(_) => "Invalid zip / location not known to the weather service.",
            Self::Api { status, .. } if *status >= 500 => {
                "Weather service unavailable. Please try again later."
            }
            Self::Api { .. } => "Weather API response error.",
            Self::Parse(_) => "Received an unexpected weather response.",
        }
    }
}
