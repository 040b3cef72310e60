//! Local copy of the location dataset.
//!
//! The dataset is published gzip-compressed. A download is only attempted
//! when no cache file exists, and the file is only written once the body has
//! been decompressed and parsed successfully.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::Client;

use crate::error::CacheError;
use crate::protocol::CacheStatus;
use crate::types::Dataset;

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone)]
pub struct DatasetCache {
    cache_path: PathBuf,
    dataset_url: String,
    client: Client,
}

impl DatasetCache {
    pub fn new(
        cache_path: impl Into<PathBuf>,
        dataset_url: impl Into<String>,
    ) -> Result<Self, CacheError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            cache_path: cache_path.into(),
            dataset_url: dataset_url.into(),
            client,
        })
    }

    pub fn path(&self) -> &Path {
        &self.cache_path
    }

    pub fn exists(&self) -> bool {
        self.cache_path.is_file()
    }

    /// Read and parse the cached dataset.
    pub async fn load(&self) -> Result<Dataset, CacheError> {
        let bytes = tokio::fs::read(&self.cache_path).await?;
        let dataset = tokio::task::spawn_blocking(move || Dataset::from_json(&bytes)).await??;
        tracing::info!(
            "Loaded {} locations from {}",
            dataset.len(),
            self.cache_path.display()
        );
        Ok(dataset)
    }

    /// Download the dataset unless a cached copy already exists.
    pub async fn download(&self) -> Result<CacheStatus, CacheError> {
        if self.exists() {
            tracing::info!("Cache already present at {}", self.cache_path.display());
            return Ok(CacheStatus::AlreadyExists);
        }

        tracing::info!("Downloading location dataset from {}", self.dataset_url);
        let response = self.client.get(&self.dataset_url).send().await?;
        if !response.status().is_success() {
            return Err(CacheError::Status(response.status().as_u16()));
        }
        let body = response.bytes().await?;

        // Refuse to cache something the resolver could not load.
        let (json, dataset) = tokio::task::spawn_blocking(move || {
            let json = decompress(&body)?;
            let dataset = Dataset::from_json(&json)?;
            Ok::<_, CacheError>((json, dataset))
        })
        .await??;

        if let Some(parent) = self.cache_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let partial = self.cache_path.with_extension("part");
        tokio::fs::write(&partial, &json).await?;
        tokio::fs::rename(&partial, &self.cache_path).await?;

        tracing::info!(
            "Cached {} locations at {}",
            dataset.len(),
            self.cache_path.display()
        );
        Ok(CacheStatus::Downloaded)
    }
}

/// Gunzip `body` if it carries the gzip magic bytes, else return it as-is.
fn decompress(body: &[u8]) -> Result<Vec<u8>, CacheError> {
    if !body.starts_with(&GZIP_MAGIC) {
        return Ok(body.to_vec());
    }
    let mut json = Vec::new();
    GzDecoder::new(body).read_to_end(&mut json)?;
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decompress_plain_passthrough() {
        let body = br#"[]"#;
        assert_eq!(decompress(body).unwrap(), body.to_vec());
    }

    #[test]
    fn test_decompress_gzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"[1, 2, 3]").unwrap();
        let gz = encoder.finish().unwrap();
        assert_eq!(decompress(&gz).unwrap(), b"[1, 2, 3]".to_vec());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.list.json");
        let cache = DatasetCache::new(path, "http://localhost/x").unwrap();
        assert!(!cache.exists());
        assert!(matches!(cache.load().await, Err(CacheError::Io(_))));
    }

    #[tokio::test]
    async fn test_download_skips_existing_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("city.list.json");
        std::fs::write(&path, "[]").unwrap();

        // Unroutable URL: any network access would fail the test.
        let cache = DatasetCache::new(&path, "http://127.0.0.1:9/city.list.json.gz").unwrap();
        assert_eq!(cache.download().await.unwrap(), CacheStatus::AlreadyExists);
    }
}
