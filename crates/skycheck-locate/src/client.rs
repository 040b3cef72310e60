//! The requester side of the channel.

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::error::ChannelError;
use crate::outcome::ResolutionOutcome;
use crate::protocol::{read_frame, write_frame, CacheStatus, Request, Response};
use crate::types::QueryFilters;

/// One long-lived connection to the resolver.
///
/// Requests and responses strictly alternate; there is no timeout, so a
/// resolver that never answers blocks the caller.
pub struct ResolverClient<S> {
    stream: S,
}

impl ResolverClient<TcpStream> {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ChannelError> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

impl<S> ResolverClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Send one request and wait for its response.
    pub async fn request(&mut self, request: &Request) -> Result<Response, ChannelError> {
        tracing::debug!(kind = request.kind(), "Sending request");
        write_frame(&mut self.stream, request).await?;
        read_frame(&mut self.stream)
            .await?
            .ok_or(ChannelError::Disconnected)
    }

    pub async fn query(&mut self, name: &str) -> Result<ResolutionOutcome, ChannelError> {
        let request = Request::Query {
            name: name.to_string(),
        };
        self.resolution(request).await
    }

    pub async fn filter_query(
        &mut self,
        filters: QueryFilters,
    ) -> Result<ResolutionOutcome, ChannelError> {
        self.resolution(Request::FilterQuery(filters)).await
    }

    /// Returns `None` when the resolver rejects the zip code.
    pub async fn zip_query(&mut self, raw: &str) -> Result<Option<u32>, ChannelError> {
        let request = Request::ZipQuery {
            raw: raw.to_string(),
        };
        match self.request(&request).await? {
            Response::ParsedZip(zip) => Ok(Some(zip)),
            Response::InvalidZip => Ok(None),
            other => Err(unexpected(&request, &other)),
        }
    }

    pub async fn download_cache(&mut self) -> Result<CacheStatus, ChannelError> {
        let request = Request::CacheDownload;
        match self.request(&request).await? {
            Response::Ack(status) => Ok(status),
            other => Err(unexpected(&request, &other)),
        }
    }

    /// Tell the resolver to shut down. No response is expected.
    pub async fn quit(mut self) -> Result<(), ChannelError> {
        write_frame(&mut self.stream, &Request::Quit).await
    }

    async fn resolution(&mut self, request: Request) -> Result<ResolutionOutcome, ChannelError> {
        match self.request(&request).await? {
            Response::Resolution(outcome) => Ok(outcome),
            other => Err(unexpected(&request, &other)),
        }
    }
}

fn unexpected(request: &Request, response: &Response) -> ChannelError {
    ChannelError::UnexpectedResponse {
        request: request.kind(),
        response: response.kind().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mismatched_response_is_error() {
        let (client_end, mut server_end) = tokio::io::duplex(1024);
        let mut client = ResolverClient::new(client_end);

        let resolver = tokio::spawn(async move {
            let _req: Option<Request> = read_frame(&mut server_end).await.unwrap();
            write_frame(&mut server_end, &Response::InvalidZip).await.unwrap();
            server_end
        });

        let result = client.query("paris").await;
        assert!(matches!(
            result,
            Err(ChannelError::UnexpectedResponse { request: "query", .. })
        ));
        resolver.await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_channel_is_disconnected() {
        let (client_end, server_end) = tokio::io::duplex(1024);
        drop(server_end);
        let mut client = ResolverClient::new(client_end);
        let result = client.download_cache().await;
        assert!(result.is_err());
    }
}
