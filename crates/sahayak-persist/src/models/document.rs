use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Text extracted from one uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub user_id: String,
    pub file_path: String,
    pub extracted_text: String,
    pub processed_at: DateTime<Utc>,
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Completed,
}
