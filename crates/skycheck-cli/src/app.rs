use std::sync::Arc;
use std::time::Duration;

use skycheck_core::{AppError, Config, LookupError, TemperatureUnit};
use skycheck_locate::{CacheStatus, ResolverClient};
use skycheck_weather::WeatherProvider;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::console::Console;
use crate::render;
use crate::session::Session;

/// The requester: top-level menu and lifecycle.
///
/// This is the only loop in the program. Every failed lookup is reported
/// here and control comes back to the menu.
pub struct App<S, C> {
    config: Arc<Config>,
    client: ResolverClient<S>,
    console: C,
}

impl<S, C> App<S, C>
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: Console,
{
    pub fn new(config: Config, client: ResolverClient<S>, console: C) -> Self {
        Self {
            config: Arc::new(config),
            client,
            console,
        }
    }

    /// Run until the user exits, stdin closes, or the resolver goes away.
    pub async fn run(mut self) -> Result<(), AppError> {
        tracing::info!("Requester started");

        if !self.config.resolver.has_cache() {
            self.header();
            if let Err(e) = self.offer_download().await {
                self.report(&e)?;
                if e.is_fatal() {
                    return Err(e);
                }
            }
        }

        loop {
            self.header();
            self.console.show("[1] Get Weather");
            self.console.show("[2] Exit");
            self.console.show("");
            let input = self.console.ask("Input [#]: ")?;

            match input.trim() {
                "1" | "[1]" => match self.get_weather().await {
                    Ok(()) => {
                        self.console.show("");
                        self.console.pause()?;
                    }
                    Err(e) => {
                        self.report(&e)?;
                        if e.is_fatal() {
                            return Err(e);
                        }
                    }
                },
                "2" | "[2]" => break,
                other => {
                    let err = AppError::from(LookupError::InvalidUserSelection(other.to_string()));
                    self.report(&err)?;
                }
            }
        }

        self.shutdown().await
    }

    /// Ask the resolver to fetch the location dataset.
    async fn offer_download(&mut self) -> Result<(), AppError> {
        self.console.show("NOTE: To function - skycheck requires");
        self.console.show("a local copy of the location cache.");
        self.console.show("");
        self.console.show("Download [Y/N]?");
        self.console.show("");
        let input = self.console.ask("Input: ")?;

        match input.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => {
                let status = self
                    .client
                    .download_cache()
                    .await
                    .map_err(LookupError::from)?;
                match status {
                    CacheStatus::Downloaded => {
                        self.console.show("");
                        self.console.show("! - Download Successful - !");
                        self.console.show("");
                        self.console.pause()?;
                        Ok(())
                    }
                    CacheStatus::AlreadyExists => Err(LookupError::CacheAlreadyExists.into()),
                    CacheStatus::Failed { reason } => {
                        Err(LookupError::CacheDownloadFailed(reason).into())
                    }
                }
            }
            "n" | "no" => {
                self.console.show("");
                self.console.show("! - User selected 'No' - !");
                self.console.show("Search feature unavailable...");
                self.console.show("");
                self.console.pause()?;
                Ok(())
            }
            _ => Err(LookupError::InvalidUserSelection(input.trim().to_string()).into()),
        }
    }

    /// Resolve a location, then fetch and print its current weather.
    ///
    /// The API key is only checked once a location has been resolved.
    async fn get_weather(&mut self) -> Result<(), AppError> {
        self.header();
        let location = Session::new()
            .run(&mut self.client, &mut self.console)
            .await?;
        tracing::info!("Resolved location: {}", location.label());

        let weather = &self.config.weather;
        let provider = WeatherProvider::new(
            &weather.base_url,
            weather.api_key.as_deref(),
            weather_unit(weather.temperature_unit),
            Duration::from_secs(weather.timeout_secs),
        )
        .map_err(weather_error)?;
        let current = provider
            .fetch(&location.weather_target())
            .await
            .map_err(weather_error)?;

        self.header();
        for line in render::weather_lines(&location, &current) {
            self.console.show(&line);
        }
        Ok(())
    }

    /// Show an error and wait for acknowledgment before returning to the menu.
    fn report(&mut self, err: &AppError) -> Result<(), AppError> {
        tracing::warn!("Operation failed: {}", err);
        self.console.show("");
        self.console.show(&format!("! - {} - !", err.user_message()));
        self.console.show("");
        self.console.pause()?;
        Ok(())
    }

    fn header(&mut self) {
        self.console.clear();
        for line in render::HEADER {
            self.console.show(line);
        }
        self.console.show("");
    }

    /// Tell the resolver to quit and clear the screen.
    async fn shutdown(self) -> Result<(), AppError> {
        tracing::info!("Shutting down requester");
        let Self {
            client,
            mut console,
            ..
        } = self;
        client.quit().await.map_err(LookupError::from)?;
        console.clear();
        Ok(())
    }
}

fn weather_unit(unit: TemperatureUnit) -> skycheck_weather::TemperatureUnit {
    match unit {
        TemperatureUnit::Auto => skycheck_weather::TemperatureUnit::Auto,
        TemperatureUnit::Celsius => skycheck_weather::TemperatureUnit::Celsius,
        TemperatureUnit::Fahrenheit => skycheck_weather::TemperatureUnit::Fahrenheit,
    }
}

fn weather_error(err: skycheck_weather::WeatherError) -> AppError {
    tracing::warn!("Weather lookup failed: {}", err);
    AppError::Weather(err.user_message().to_string())
}
