use mongodb::{Client, Collection, bson, bson::doc};

use crate::dbs::mongo::models::MongoUser;
use crate::error::Result;
use crate::models::{SubscriptionUpdate, Tier};

#[derive(Clone)]
pub struct MongoUserRepository {
    client: Client,
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { client: client.clone(), collection }
    }

    /// Get user by id
    pub async fn get_user(&self, user_id: &str) -> Result<Option<MongoUser>> {
        let filter = doc! { "_id": user_id };
        Ok(self.collection.find_one(filter).await?)
    }

    /// Stamp the last request and bump the audit counter
    pub async fn record_request(&self, user_id: &str, at_ms: i64) -> Result<()> {
        let filter = doc! { "_id": user_id };
        let update = doc! {
            "$set": { "last_request": at_ms },
            "$inc": { "requests_used": 1_i64 },
            "$setOnInsert": { "subscription": Tier::Free.as_str() }
        };

        self.collection.update_one(filter, update).upsert(true).await?;
        Ok(())
    }

    /// Overwrite subscription fields
    pub async fn apply_subscription(&self, user_id: &str, change: SubscriptionUpdate) -> Result<()> {
        let filter = doc! { "_id": user_id };
        let update = doc! {
            "$set": {
                "subscription": change.tier.as_str(),
                "subscription_status": change.status,
                "subscription_updated": bson::DateTime::from_chrono(change.updated_at),
                "tokens": change.tokens
            }
        };

        self.collection.update_one(filter, update).upsert(true).await?;
        Ok(())
    }

    /// Reset counters of every free-tier user.
    ///
    /// The `updateMany` runs inside a transaction so either every matched
    /// user is reset or none is. Requires a replica set or sharded cluster.
    pub async fn reset_free_tier(&self, tokens: i64) -> Result<u64> {
        let filter = doc! { "subscription": Tier::Free.as_str() };
        let update = doc! {
            "$set": { "requests_used": 0_i64, "tokens": tokens }
        };

        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let result = match self
            .collection
            .update_many(filter, update)
            .session(&mut session)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::warn!(error = %abort_err, "Failed to abort reset transaction");
                }
                return Err(e.into());
            }
        };

        session.commit_transaction().await?;
        Ok(result.matched_count)
    }
}
