use futures::TryStreamExt;
use bson::doc;
use mongodb::{Client, Collection};

use crate::error::{PersistError, Result};
use crate::models::LibraryItemDocument;

#[derive(Clone)]
pub struct MongoLibraryRepository {
    collection: Collection<LibraryItemDocument>,
}

impl MongoLibraryRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("library_items");
        Self { collection }
    }

    pub async fn list_items(&self, username: &str, limit: i64) -> Result<Vec<LibraryItemDocument>> {
        let items = self
            .collection
            .find(doc! { "username": username })
            .sort(doc! { "createdAt": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(items)
    }

    /// Items carry their own string id so the driver never assigns an ObjectId
    pub async fn insert_item(&self, item: &LibraryItemDocument) -> Result<String> {
        let id = item
            .id
            .clone()
            .ok_or_else(|| PersistError::InvalidPayload("library item has no id".to_string()))?;
        self.collection.insert_one(item).await?;
        Ok(id)
    }

    pub async fn delete_item(&self, item_id: &str, username: &str) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": item_id, "username": username })
            .await?;
        Ok(())
    }
}
