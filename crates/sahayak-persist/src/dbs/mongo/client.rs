use mongodb::{Client, Database, bson::doc};
use async_trait::async_trait;

use crate::trait_client::PersistenceClient;
use crate::models::{ChatRecord, DocumentRecord, SubscriptionUpdate, UserRecord};
use crate::dbs::mongo::models::{MongoChat, MongoDocument};
use crate::dbs::mongo::repositories::{
    MongoChatRepository, MongoDocumentRepository, MongoUserRepository,
};
use crate::error::{Result, PersistError};

pub struct MongoPersistenceClient {
    database: Database,
    user_repo: MongoUserRepository,
    chat_repo: MongoChatRepository,
    document_repo: MongoDocumentRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database = %database, "MongoDB client created");

        Ok(Self {
            database: client.database(database),
            user_repo: MongoUserRepository::new(&client, database),
            chat_repo: MongoChatRepository::new(&client, database),
            document_repo: MongoDocumentRepository::new(&client, database),
        })
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>> {
        let user = self.user_repo.get_user(user_id).await?;
        Ok(user.map(Into::into))
    }

    async fn record_request(&self, user_id: &str, at_ms: i64) -> Result<()> {
        self.user_repo.record_request(user_id, at_ms).await
    }

    async fn apply_subscription(&self, user_id: &str, update: SubscriptionUpdate) -> Result<()> {
        self.user_repo.apply_subscription(user_id, update).await
    }

    async fn reset_free_tier(&self, tokens: i64) -> Result<u64> {
        self.user_repo.reset_free_tier(tokens).await
    }

    async fn save_chat(&self, chat: ChatRecord) -> Result<()> {
        let id = self.chat_repo.save_chat(MongoChat::from(chat)).await?;
        tracing::debug!(chat_id = %id, "Chat record saved");
        Ok(())
    }

    async fn save_document(&self, document: DocumentRecord) -> Result<()> {
        let id = self.document_repo.save_document(MongoDocument::from(document)).await?;
        tracing::debug!(document_id = %id, "Document record saved");
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
