//! Requester/resolver message contract and framing.
//!
//! Each frame is a big-endian `u32` length followed by a bincode-encoded
//! `Request` or `Response`. Encoding and decoding are plain functions over
//! bytes; `read_frame`/`write_frame` add the async I/O on top.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ChannelError;
use crate::outcome::ResolutionOutcome;
use crate::types::QueryFilters;

/// Frames larger than this are treated as a broken channel.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Messages sent by the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    /// Fetch the location dataset if it is not cached yet
    CacheDownload,
    /// Free-text name lookup
    Query { name: String },
    /// Name lookup narrowed by country and/or state
    FilterQuery(QueryFilters),
    /// Validate a zip code; no dataset access
    ZipQuery { raw: String },
    /// Close the channel; no response follows
    Quit,
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::CacheDownload => "cache_download",
            Request::Query { .. } => "query",
            Request::FilterQuery(_) => "filter_query",
            Request::ZipQuery { .. } => "zip_query",
            Request::Quit => "quit",
        }
    }
}

/// Outcome of a `CacheDownload` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStatus {
    Downloaded,
    AlreadyExists,
    Failed { reason: String },
}

/// Messages sent by the resolver, exactly one per request (except `Quit`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Ack(CacheStatus),
    Resolution(ResolutionOutcome),
    ParsedZip(u32),
    InvalidZip,
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Response::Ack(_) => "ack",
            Response::Resolution(_) => "resolution",
            Response::ParsedZip(_) => "parsed_zip",
            Response::InvalidZip => "invalid_zip",
        }
    }
}

/// Encode a message into a length-prefixed frame.
pub fn encode_frame<T: Serialize>(msg: &T) -> Result<Vec<u8>, ChannelError> {
    let data = bincode::serialize(msg)?;
    if data.len() > MAX_FRAME_LEN {
        return Err(ChannelError::FrameTooLarge(data.len()));
    }
    let len = data.len() as u32;

    let mut frame = Vec::with_capacity(4 + data.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&data);
    Ok(frame)
}

/// Decode a frame body (without its length prefix).
pub fn decode_frame<T: DeserializeOwned>(data: &[u8]) -> Result<T, ChannelError> {
    Ok(bincode::deserialize(data)?)
}

/// Write one message to `writer` and flush it.
pub async fn write_frame<W, T>(writer: &mut W, msg: &T) -> Result<(), ChannelError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let frame = encode_frame(msg)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one message from `reader`.
///
/// Returns `Ok(None)` when the peer closed the channel between frames. A
/// close partway through a frame is `ChannelError::Truncated`.
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, ChannelError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut len_buf = [0u8; 4];
    if reader.read(&mut len_buf[..1]).await? == 0 {
        return Ok(None);
    }
    read_rest(reader, &mut len_buf[1..]).await?;

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        tracing::warn!("message too large: {} bytes", len);
        return Err(ChannelError::FrameTooLarge(len));
    }

    let mut data = vec![0u8; len];
    read_rest(reader, &mut data).await?;
    decode_frame(&data).map(Some)
}

async fn read_rest<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), ChannelError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(ChannelError::Truncated),
        Err(e) => Err(e.into()),
    }
}
