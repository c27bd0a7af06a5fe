use futures::TryStreamExt;
use bson::doc;
use mongodb::{Client, Collection};

use crate::error::Result;
use crate::models::ChatDocument;

#[derive(Clone)]
pub struct MongoChatRepository {
    collection: Collection<ChatDocument>,
}

impl MongoChatRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chats");
        Self { collection }
    }

    /// List chats for a user, most recently updated first
    pub async fn list_chats(&self, username: &str, limit: i64) -> Result<Vec<ChatDocument>> {
        let chats = self
            .collection
            .find(doc! { "username": username })
            .sort(doc! { "updatedAt": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(chats)
    }

    /// Replace the whole document, inserting it on first save
    pub async fn upsert_chat(&self, chat: &ChatDocument) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": chat.id.as_str() }, chat)
            .upsert(true)
            .await?;
        Ok(())
    }

    pub async fn delete_chat(&self, chat_id: &str, username: &str) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": chat_id, "username": username })
            .await?;
        Ok(())
    }
}
