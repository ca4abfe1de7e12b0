use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;

use crate::credentials::Credentials;

pub const VISION_API_BASE: &str = "https://vision.googleapis.com";

/// OCR over raw image bytes
#[async_trait]
pub trait TextDetector: Send + Sync {
    /// Full text of the first annotation, or `None` when nothing was detected
    async fn detect_text(&self, image: &[u8]) -> Result<Option<String>>;
}

/// Google Cloud Vision `images:annotate` client using `TEXT_DETECTION`
pub struct VisionClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl VisionClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: VISION_API_BASE.to_string(),
            credentials,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextDetector for VisionClient {
    async fn detect_text(&self, image: &[u8]) -> Result<Option<String>> {
        let payload = json!({
            "requests": [{
                "image": { "content": STANDARD.encode(image) },
                "features": [{ "type": "TEXT_DETECTION" }]
            }]
        });

        let request = self
            .http_client
            .post(format!("{}/v1/images:annotate", self.base_url))
            .json(&payload);
        let response = self
            .credentials
            .authorize(&self.http_client, request)
            .await?
            .send()
            .await
            .context("Failed to send annotate request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Vision API error ({}): {}", status, error_text);
        }

        let raw: AnnotateResponse = response
            .json()
            .await
            .context("Failed to parse annotate response")?;

        first_description(raw)
    }
}

fn first_description(raw: AnnotateResponse) -> Result<Option<String>> {
    let Some(result) = raw.responses.into_iter().next() else {
        return Ok(None);
    };

    if let Some(error) = result.error {
        anyhow::bail!("Vision annotation failed ({}): {}", error.code, error.message);
    }

    Ok(result
        .text_annotations
        .into_iter()
        .next()
        .map(|annotation| annotation.description))
}

// ============================================================================
// VISION RESPONSE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}
