use async_trait::async_trait;
use crate::models::{ChatRecord, DocumentRecord, SubscriptionUpdate, UserRecord};
use crate::error::Result;

/// Trait for database persistence operations
///
/// Every method maps to a single storage command. Nothing here wraps a
/// read-check-write sequence in a transaction: callers that read a user and
/// then write it race with other writers on the same user (last write wins).
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Fetch a user record; `None` when the user has never been seen
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>>;

    /// Stamp `last_request` and increment `requests_used` by one.
    ///
    /// Creates the record with tier `free` when it does not exist yet.
    async fn record_request(&self, user_id: &str, at_ms: i64) -> Result<()>;

    /// Overwrite tier, status, update time and token balance
    async fn apply_subscription(&self, user_id: &str, update: SubscriptionUpdate) -> Result<()>;

    /// Set `requests_used = 0` and `tokens = tokens` for every free-tier user
    /// in one multi-document write. Returns the number of users matched.
    async fn reset_free_tier(&self, tokens: i64) -> Result<u64>;

    /// Append a chat exchange
    async fn save_chat(&self, chat: ChatRecord) -> Result<()>;

    /// Append an OCR result
    async fn save_document(&self, document: DocumentRecord) -> Result<()>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> Result<()>;
}
