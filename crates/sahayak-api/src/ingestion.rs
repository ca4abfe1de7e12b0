use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sahayak_cloud::{ObjectStore, TextDetector};
use sahayak_persist::{DocumentRecord, DocumentStatus, PersistenceClient};

/// Object metadata delivered with a storage finalize event
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageObject {
    /// Full object path, e.g. `uploads/{userId}/scan.png`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Not an image, or not addressable to a user
    Skipped,
    Stored,
    /// Logged and dropped
    Failed,
}

pub fn is_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("image/"))
}

/// Second path segment: `uploads/user123/scan.png` belongs to `user123`
pub fn user_id_from_path(path: &str) -> Option<&str> {
    path.split('/').nth(1).filter(|segment| !segment.is_empty())
}

/// Turns uploaded images into OCR document records
#[derive(Clone)]
pub struct DocumentIngestor {
    store: Arc<dyn PersistenceClient>,
    objects: Arc<dyn ObjectStore>,
    ocr: Arc<dyn TextDetector>,
    default_bucket: String,
}

impl DocumentIngestor {
    pub fn new(
        store: Arc<dyn PersistenceClient>,
        objects: Arc<dyn ObjectStore>,
        ocr: Arc<dyn TextDetector>,
        default_bucket: impl Into<String>,
    ) -> Self {
        Self {
            store,
            objects,
            ocr,
            default_bucket: default_bucket.into(),
        }
    }

    /// Never fails: every error is logged and reported as `Failed` so the
    /// event source does not redeliver
    pub async fn handle(&self, object: &StorageObject) -> IngestOutcome {
        match self.ingest(object).await {
            Ok(Some(document)) => {
                tracing::info!(
                    user_id = %document.user_id,
                    file_path = %document.file_path,
                    chars = document.extracted_text.chars().count(),
                    "Document processed"
                );
                IngestOutcome::Stored
            }
            Ok(None) => IngestOutcome::Skipped,
            Err(e) => {
                tracing::error!(
                    object = ?object.name,
                    error = %format!("{e:#}"),
                    "Document processing failed"
                );
                IngestOutcome::Failed
            }
        }
    }

    async fn ingest(&self, object: &StorageObject) -> anyhow::Result<Option<DocumentRecord>> {
        if !is_image(object.content_type.as_deref()) {
            tracing::debug!(
                object = ?object.name,
                content_type = ?object.content_type,
                "Ignoring non-image object"
            );
            return Ok(None);
        }

        let Some(path) = object.name.as_deref() else {
            tracing::warn!("Finalize event without object name");
            return Ok(None);
        };
        let Some(user_id) = user_id_from_path(path) else {
            tracing::warn!(path = %path, "Object path has no user segment");
            return Ok(None);
        };

        let bucket = object.bucket.as_deref().unwrap_or(self.default_bucket.as_str());
        let image = self
            .objects
            .download(bucket, path)
            .await
            .with_context(|| format!("Failed to download {bucket}/{path}"))?;

        let extracted_text = self
            .ocr
            .detect_text(&image)
            .await
            .context("Text detection failed")?
            .unwrap_or_default();

        let document = DocumentRecord {
            user_id: user_id.to_string(),
            file_path: path.to_string(),
            extracted_text,
            processed_at: Utc::now(),
            status: DocumentStatus::Completed,
        };
        self.store
            .save_document(document.clone())
            .await
            .context("Failed to save document")?;

        Ok(Some(document))
    }
}
