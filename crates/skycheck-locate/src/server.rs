//! The resolver side of the channel.
//!
//! Requests are served strictly one at a time: each is fully handled and
//! answered before the next frame is read.

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::instrument;

use crate::cache::DatasetCache;
use crate::error::ChannelError;
use crate::matcher::find_matches;
use crate::outcome::ResolutionOutcome;
use crate::protocol::{read_frame, write_frame, CacheStatus, Request, Response};
use crate::types::{Dataset, QueryFilters};
use crate::zip::parse_zip;

pub struct ResolverServer {
    dataset: Dataset,
    cache: Option<DatasetCache>,
}

impl ResolverServer {
    /// Serve a fixed dataset. `CacheDownload` requests report failure.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            cache: None,
        }
    }

    /// Serve the dataset held in `cache`, loading it if present.
    ///
    /// A missing or unreadable cache starts the server with an empty dataset;
    /// every query then answers `NoMatch` until a download succeeds.
    pub async fn from_cache(cache: DatasetCache) -> Self {
        let dataset = if cache.exists() {
            match cache.load().await {
                Ok(dataset) => dataset,
                Err(e) => {
                    tracing::warn!("Failed to load location cache: {}", e);
                    Dataset::default()
                }
            }
        } else {
            tracing::warn!(
                "No location cache at {}; queries will not match until it is downloaded",
                cache.path().display()
            );
            Dataset::default()
        };

        Self {
            dataset,
            cache: Some(cache),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Run the match/filter engine and package the result.
    pub fn resolve(&self, filters: &QueryFilters) -> ResolutionOutcome {
        let matches = find_matches(&self.dataset, filters);
        tracing::debug!(name = %filters.name, matches = matches.len(), "Resolved query");
        ResolutionOutcome::from_matches(matches)
    }

    /// Handle one request. Returns `None` for `Quit`.
    #[instrument(skip(self), fields(kind = request.kind()), level = "info")]
    pub async fn handle(&mut self, request: Request) -> Option<Response> {
        let response = match request {
            Request::Quit => return None,
            Request::CacheDownload => Response::Ack(self.download().await),
            Request::Query { name } => {
                Response::Resolution(self.resolve(&QueryFilters::by_name(&name)))
            }
            Request::FilterQuery(filters) => {
                Response::Resolution(self.resolve(&filters.normalized()))
            }
            Request::ZipQuery { raw } => match parse_zip(&raw) {
                Some(zip) => Response::ParsedZip(zip),
                None => Response::InvalidZip,
            },
        };
        Some(response)
    }

    async fn download(&mut self) -> CacheStatus {
        let Some(cache) = &self.cache else {
            return CacheStatus::Failed {
                reason: "no cache location configured".to_string(),
            };
        };

        let status = match cache.download().await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("Cache download failed: {}", e);
                return CacheStatus::Failed {
                    reason: e.user_message().to_string(),
                };
            }
        };

        if status == CacheStatus::Downloaded {
            match cache.load().await {
                Ok(dataset) => self.dataset = dataset,
                Err(e) => {
                    tracing::error!("Downloaded cache could not be loaded: {}", e);
                    return CacheStatus::Failed {
                        reason: e.user_message().to_string(),
                    };
                }
            }
        }
        status
    }

    /// Serve requests from `stream` until `Quit` or the requester disconnects.
    pub async fn serve<S>(&mut self, mut stream: S) -> Result<(), ChannelError>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        loop {
            let request: Request = match read_frame(&mut stream).await? {
                Some(request) => request,
                None => {
                    tracing::info!("Requester disconnected");
                    return Ok(());
                }
            };

            match self.handle(request).await {
                Some(response) => {
                    tracing::debug!(kind = response.kind(), "Sending response");
                    write_frame(&mut stream, &response).await?;
                }
                None => {
                    tracing::info!("Quit received, closing channel");
                    if let Err(e) = stream.shutdown().await {
                        tracing::debug!("Channel shutdown: {}", e);
                    }
                    return Ok(());
                }
            }
        }
    }
}
