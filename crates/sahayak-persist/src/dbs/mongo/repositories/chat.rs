use mongodb::{Client, Collection, bson::oid::ObjectId};

use crate::dbs::mongo::models::MongoChat;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoChatRepository {
    collection: Collection<MongoChat>,
}

impl MongoChatRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chats");
        Self { collection }
    }

    /// Append a chat exchange
    pub async fn save_chat(&self, chat: MongoChat) -> Result<ObjectId> {
        self.collection.insert_one(&chat).await?;
        Ok(chat.id)
    }
}
