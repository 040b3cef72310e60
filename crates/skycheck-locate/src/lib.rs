//! Location resolution for skycheck.
//!
//! Owns the location dataset, the exact-match engine, and the message
//! contract spoken between the requester and the resolver process.

pub mod cache;
pub mod client;
pub mod error;
pub mod matcher;
pub mod outcome;
pub mod protocol;
pub mod server;
pub mod types;
pub mod zip;

pub use cache::DatasetCache;
pub use client::ResolverClient;
pub use error::{CacheError, ChannelError};
pub use matcher::find_matches;
pub use outcome::{MultipleMatches, ResolutionOutcome, PREVIEW_LIMIT, TRUNCATION_MARKER};
pub use protocol::{CacheStatus, Request, Response};
pub use server::ResolverServer;
pub use types::{Coordinates, Dataset, LocationRecord, MatchSet, QueryFilters};
pub use zip::parse_zip;
