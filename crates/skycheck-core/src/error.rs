//! Centralized error types for skycheck.
//!
//! Every lookup-time failure ends the current top-level operation. The
//! requester shows `user_message()`, waits for acknowledgment and returns to
//! the menu; nothing here is retried in place.

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a terminal-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Weather collaborator failure, already reduced to a user-facing message.
    #[error("Weather service error: {0}")]
    Weather(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for the terminal.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Lookup(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(msg) => msg.clone(),
            AppError::Io(_) => "Terminal input failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }

    /// True if the requester can no longer talk to the resolver or the user.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AppError::Lookup(LookupError::ChannelFailure(_)) | AppError::Io(_)
        )
    }
}

/// Errors raised while resolving a location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No location matching {0:?}")]
    NoMatchFound(String),

    #[error("Invalid zip code: {0:?}")]
    InvalidZipFormat(String),

    #[error("Location cache already exists")]
    CacheAlreadyExists,

    #[error("Location cache download failed: {0}")]
    CacheDownloadFailed(String),

    #[error("Invalid selection: {0:?}")]
    InvalidUserSelection(String),

    #[error("Resolver channel failure: {0}")]
    ChannelFailure(String),
}

impl LookupError {
    pub fn user_message(&self) -> String {
        match self {
            Self::NoMatchFound(name) if name.is_empty() => {
                "No matching location identified.".to_string()
            }
            Self::NoMatchFound(name) => format!("No location matching {} identified.", name),
            Self::InvalidZipFormat(_) => "Invalid zip code. Zip codes must be numeric.".to_string(),
            Self::CacheAlreadyExists => "Local cache file already exists.".to_string(),
            Self::CacheDownloadFailed(_) => {
                "Location cache download failed. Search feature unavailable.".to_string()
            }
            Self::InvalidUserSelection(_) => "Invalid input.".to_string(),
            Self::ChannelFailure(_) => {
                "Lost contact with the location resolver. Restart skycheck-resolver.".to_string()
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}
