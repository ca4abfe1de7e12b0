use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{ChatRecord, DocumentRecord, SubscriptionUpdate, Tier, UserRecord};
use crate::trait_client::PersistenceClient;

/// Process-local backend for development runs and tests.
///
/// Mirrors the MongoDB semantics: request stamps and subscriptions upsert,
/// chats and documents append.
#[derive(Default)]
pub struct InMemoryPersistenceClient {
    users: RwLock<HashMap<String, UserRecord>>,
    chats: RwLock<Vec<ChatRecord>>,
    documents: RwLock<Vec<DocumentRecord>>,
}

impl InMemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a user record
    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.user_id.clone(), user);
    }

    pub async fn user(&self, user_id: &str) -> Option<UserRecord> {
        self.users.read().await.get(user_id).cloned()
    }

    pub async fn chats(&self) -> Vec<ChatRecord> {
        self.chats.read().await.clone()
    }

    pub async fn documents(&self) -> Vec<DocumentRecord> {
        self.documents.read().await.clone()
    }
}

#[async_trait]
impl PersistenceClient for InMemoryPersistenceClient {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        Ok(self.user(user_id).await)
    }

    async fn record_request(&self, user_id: &str, at_ms: i64) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord::new(user_id).with_tier(Tier::Free));
        user.last_request = Some(at_ms);
        user.requests_used += 1;
        Ok(())
    }

    async fn apply_subscription(&self, user_id: &str, update: SubscriptionUpdate) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .entry(user_id.to_string())
            .or_insert_with(|| UserRecord::new(user_id));
        user.subscription = Some(update.tier);
        user.subscription_status = Some(update.status);
        user.subscription_updated = Some(update.updated_at);
        user.tokens = update.tokens;
        Ok(())
    }

    async fn reset_free_tier(&self, tokens: i64) -> Result<u64> {
        let mut users = self.users.write().await;
        let mut matched = 0;
        for user in users.values_mut().filter(|u| u.is_free_tier()) {
            user.requests_used = 0;
            user.tokens = tokens;
            matched += 1;
        }
        Ok(matched)
    }

    async fn save_chat(&self, chat: ChatRecord) -> Result<()> {
        self.chats.write().await.push(chat);
        Ok(())
    }

    async fn save_document(&self, document: DocumentRecord) -> Result<()> {
        self.documents.write().await.push(document);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
