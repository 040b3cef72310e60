//! Weather service for skycheck
//!
//! Fetches current conditions from OpenWeatherMap for either a resolved
//! dataset location (by coordinates) or a US zip code.

pub mod provider;
pub mod types;

pub use provider::WeatherProvider;
pub use types::*;
