//! Resolver-side error types.

use skycheck_core::LookupError;
use thiserror::Error;

/// Failures on the requester/resolver channel.
#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed message: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Frame of {0} bytes exceeds the size limit")]
    FrameTooLarge(usize),

    #[error("Peer closed the channel")]
    Disconnected,

    #[error("Peer closed the channel mid-frame")]
    Truncated,

    #[error("Unexpected response to {request}: {response}")]
    UnexpectedResponse {
        request: &'static str,
        response: String,
    },
}

impl From<ChannelError> for LookupError {
    fn from(err: ChannelError) -> Self {
        LookupError::ChannelFailure(err.to_string())
    }
}

/// Failures loading or downloading the location dataset.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Download returned HTTP {0}")]
    Status(u16),

    #[error("Dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Dataset decoding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CacheError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Io(_) => "Could not read or write the local location cache.",
            Self::Network(_) => "Network error while downloading the location cache.",
            Self::Status(_) => "The location cache server returned an error.",
            Self::Parse(_) => "The location cache file is corrupt.",
            Self::Task(_) => "The location cache could not be processed.",
        }
    }
}
