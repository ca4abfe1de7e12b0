use mongodb::{Client, Collection, bson::oid::ObjectId};

use crate::dbs::mongo::models::MongoDocument;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoDocumentRepository {
    collection: Collection<MongoDocument>,
}

impl MongoDocumentRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("documents");
        Self { collection }
    }

    /// Append an OCR result
    pub async fn save_document(&self, document: MongoDocument) -> Result<ObjectId> {
        self.collection.insert_one(&document).await?;
        Ok(document.id)
    }
}
