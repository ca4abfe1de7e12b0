use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::{ChatRecord, DocumentRecord, DocumentStatus, Tier, UserRecord};

/// MongoDB user document; `_id` is the caller-supplied user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_updated: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_request: Option<i64>,
    #[serde(default)]
    pub requests_used: i64,
    #[serde(default)]
    pub tokens: i64,
}

/// MongoDB chat document (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChat {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub prompt: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub timestamp: bson::DateTime,
    pub tokens_used: i64,
}

/// MongoDB document-record document (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub user_id: String,
    pub file_path: String,
    pub extracted_text: String,
    pub processed_at: bson::DateTime,
    pub status: DocumentStatus,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<MongoUser> for UserRecord {
    fn from(user: MongoUser) -> Self {
        Self {
            user_id: user.id,
            subscription: user.subscription,
            subscription_status: user.subscription_status,
            subscription_updated: user.subscription_updated.map(|d| d.to_chrono()),
            last_request: user.last_request,
            requests_used: user.requests_used,
            tokens: user.tokens,
        }
    }
}

impl From<ChatRecord> for MongoChat {
    fn from(chat: ChatRecord) -> Self {
        Self {
            id: ObjectId::new(),
            user_id: chat.user_id,
            prompt: chat.prompt,
            response: chat.response,
            language: chat.language,
            timestamp: bson::DateTime::from_chrono(chat.timestamp),
            tokens_used: i64::from(chat.tokens_used),
        }
    }
}

impl From<DocumentRecord> for MongoDocument {
    fn from(document: DocumentRecord) -> Self {
        Self {
            id: ObjectId::new(),
            user_id: document.user_id,
            file_path: document.file_path,
            extracted_text: document.extracted_text,
            processed_at: bson::DateTime::from_chrono(document.processed_at),
            status: document.status,
        }
    }
}
