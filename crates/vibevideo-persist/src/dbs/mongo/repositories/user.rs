use chrono::Utc;
use bson::{doc, Document};
use mongodb::{Client, Collection};

use crate::error::Result;
use crate::models::UserAccount;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<Document>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    pub async fn find_by_credentials(&self, username: &str, password: &str) -> Result<Option<UserAccount>> {
        let found = self
            .collection
            .find_one(doc! { "username": username, "password": password })
            .await?;
        Ok(found.map(|d| to_account(&d)))
    }

    pub async fn exists(&self, username: &str, email: &str) -> Result<bool> {
        let found = self
            .collection
            .find_one(doc! { "$or": [ { "username": username }, { "email": email } ] })
            .await?;
        Ok(found.is_some())
    }

    pub async fn insert(&self, username: &str, email: &str, password: &str) -> Result<UserAccount> {
        let now = Utc::now().to_rfc3339();
        let result = self
            .collection
            .insert_one(doc! {
                "username": username,
                "email": email,
                "password": password,
                "createdAt": now.as_str(),
                "updatedAt": now.as_str(),
            })
            .await?;

        Ok(UserAccount {
            id: result.inserted_id.as_object_id().map(|oid| oid.to_hex()),
            username: username.to_string(),
            email: Some(email.to_string()),
        })
    }
}

fn to_account(doc: &Document) -> UserAccount {
    UserAccount {
        id: doc.get_object_id("_id").ok().map(|oid| oid.to_hex()),
        username: doc.get_str("username").unwrap_or_default().to_string(),
        email: doc.get_str("email").ok().map(str::to_string),
    }
}
