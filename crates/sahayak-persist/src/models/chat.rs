use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// One completion exchange, written once and never updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub user_id: String,
    pub prompt: String,
    pub response: String,
    pub language: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub tokens_used: u32,
}
