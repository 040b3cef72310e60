use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

/// Environment variable holding the weather API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Location resolver settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Address the resolver listens on and the requester connects to
    #[serde(default = "default_resolver_address")]
    pub address: String,

    /// Local copy of the location dataset (city.list.json)
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Where the gzipped dataset is downloaded from
    #[serde(default = "default_dataset_url")]
    pub dataset_url: String,
}

fn default_resolver_address() -> String {
    "127.0.0.1:5555".to_string()
}

fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycheck")
        .join("city.list.json")
}

fn default_dataset_url() -> String {
    "https://bulk.openweathermap.org/sample/city.list.json.gz".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            address: default_resolver_address(),
            cache_path: default_cache_path(),
            dataset_url: default_dataset_url(),
        }
    }
}

impl ResolverConfig {
    /// True if the local dataset has already been downloaded.
    pub fn has_cache(&self) -> bool {
        self.cache_path.is_file()
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Auto,
    Celsius,
    Fahrenheit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the current-weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// API key, read from the environment (never written to disk)
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            temperature_unit: TemperatureUnit::Auto,
            timeout_secs: default_timeout_secs(),
            api_key: std::env::var(API_KEY_ENV).ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycheck");

        Self {
            config_dir,
            resolver: ResolverConfig::default(),
            weather: WeatherConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    ///
    /// Also loads a `.env` file from the working directory, if any, so the
    /// API key can live there.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let mut config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        config.weather.api_key = std::env::var(API_KEY_ENV).ok();

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    pub fn load_validated() -> Result<(Self, ValidationResult), AppError> {
        let config = Self::load()?;
        Ok(config.validated()?)
    }

    /// Validate `self`, failing if any check is an error.
    ///
    /// Warnings are logged and returned alongside the config.
    pub fn validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_address(&self.resolver.address, "resolver.address", &mut result);
        Self::validate_url(&self.resolver.dataset_url, "resolver.dataset_url", &mut result);
        Self::validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.resolver.cache_path.as_os_str().is_empty() {
            result.add_error("resolver.cache_path", "Cache path must not be empty");
        } else if self.resolver.cache_path.is_dir() {
            result.add_error(
                "resolver.cache_path",
                format!(
                    "Path is a directory: {}",
                    self.resolver.cache_path.display()
                ),
            );
        }

        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        } else if self.weather.timeout_secs > 300 {
            result.add_warning(
                "weather.timeout_secs",
                "Timeout is unusually long (>300 seconds)",
            );
        }

        match &self.weather.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => result.add_warning(
                "weather.api_key",
                format!("{} not set - weather lookups will fail", API_KEY_ENV),
            ),
        }

        result
    }

    fn validate_address(address: &str, field_name: &str, result: &mut ValidationResult) {
        match address.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => match port.parse::<u16>() {
                Ok(0) => result.add_error(field_name, "Port cannot be 0"),
                Ok(_) => {}
                Err(_) => result.add_error(field_name, format!("Invalid port: {}", port)),
            },
            _ => result.add_error(field_name, "Address must be in host:port form"),
        }
    }

    /// Validate a URL field
    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycheck");

        Ok(config_dir.join("config.toml"))
    }
}
