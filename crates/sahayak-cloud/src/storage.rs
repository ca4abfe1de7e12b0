use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Url;

use crate::credentials::Credentials;

pub const GCS_API_BASE: &str = "https://storage.googleapis.com";

/// Read access to uploaded objects
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download the full contents of `bucket/path`
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>>;
}

/// Google Cloud Storage JSON API client
pub struct GcsClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl GcsClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: GCS_API_BASE.to_string(),
            credentials,
        })
    }

    /// Point the client at an emulator or mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/storage/v1/b/{bucket}/o/{object}?alt=media`, with the object
    /// name encoded as a single path segment
    fn media_url(&self, bucket: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("Invalid storage base URL: {}", self.base_url))?;

        url.path_segments_mut()
            .map_err(|_| anyhow!("Storage base URL cannot be a base: {}", self.base_url))?
            .pop_if_empty()
            .extend(["storage", "v1", "b", bucket, "o", path]);
        url.query_pairs_mut().append_pair("alt", "media");

        Ok(url)
    }
}

#[async_trait]
impl ObjectStore for GcsClient {
    async fn download(&self, bucket: &str, path: &str) -> Result<Vec<u8>> {
        let url = self.media_url(bucket, path)?;
        let request = self
            .credentials
            .authorize(&self.http_client, self.http_client.get(url))
            .await?;

        let response = request.send().await.context("Failed to send download request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Storage API error ({}) for {}/{}: {}", status, bucket, path, error_text);
        }

        let bytes = response.bytes().await.context("Failed to read object body")?;
        tracing::debug!(bucket = %bucket, path = %path, size = bytes.len(), "Object downloaded");
        Ok(bytes.to_vec())
    }
}
