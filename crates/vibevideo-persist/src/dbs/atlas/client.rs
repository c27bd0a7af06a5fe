use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::AtlasConfig;
use crate::error::{PersistError, Result};
use crate::models::{object_id_string, ChatDocument, LibraryItemDocument, LoginResult, UserAccount};
use crate::trait_client::PersistenceClient;

const USERS: &str = "users";
const CHATS: &str = "chats";
const LIBRARY: &str = "library_items";

/// Client for the hosted Data API: every operation is a POST to
/// `{api_url}/action/{name}` carrying the data source, database and
/// collection alongside the operation body.
pub struct AtlasDataClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
    database: String,
    data_source: String,
    chat_limit: i64,
    library_limit: i64,
}

impl AtlasDataClient {
    pub fn new(config: &AtlasConfig, api_key: impl Into<String>) -> Result<Self> {
        if config.api_url.is_empty() {
            return Err(PersistError::NotConfigured("Data API URL is empty".to_string()));
        }

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            database: config.database.clone(),
            data_source: config.data_source.clone(),
            chat_limit: 50,
            library_limit: 100,
        })
    }

    /// Default page sizes used by `login`
    pub fn with_limits(mut self, chat_limit: i64, library_limit: i64) -> Self {
        self.chat_limit = chat_limit;
        self.library_limit = library_limit;
        self
    }

    async fn action(&self, action: &str, collection: &str, body: Value) -> Result<Value> {
        let mut payload = json!({
            "dataSource": self.data_source,
            "database": self.database,
            "collection": collection,
        });
        if let (Some(target), Value::Object(extra)) = (payload.as_object_mut(), body) {
            target.extend(extra);
        }

        tracing::debug!("Data API {} on {}", action, collection);

        let response = self
            .http_client
            .post(format!("{}/action/{}", self.api_url, action))
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .or_else(|| v.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .map(str::to_string)
                        .unwrap_or(text)
                });
            return Err(PersistError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn find_many<T: DeserializeOwned>(
        &self,
        collection: &str,
        username: &str,
        sort_field: &str,
        limit: i64,
    ) -> Result<Vec<T>> {
        let result = self
            .action(
                "find",
                collection,
                json!({
                    "filter": { "username": username },
                    "sort": { sort_field: -1 },
                    "limit": limit,
                }),
            )
            .await?;

        let documents = match result.get("documents") {
            Some(Value::Array(docs)) => docs.clone(),
            _ => Vec::new(),
        };

        // One malformed record must not hide the rest
        Ok(documents
            .into_iter()
            .filter_map(|doc| match serde_json::from_value::<T>(doc) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} document: {}", collection, e);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl PersistenceClient for AtlasDataClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        let result = self
            .action(
                "findOne",
                USERS,
                json!({ "filter": { "username": username, "password": password } }),
            )
            .await?;

        let user = match result.get("document") {
            Some(doc) if !doc.is_null() => serde_json::from_value::<UserAccount>(doc.clone())?,
            _ => return Err(PersistError::InvalidCredentials),
        };

        let (chats, library) = tokio::join!(
            self.list_chats(username, None),
            self.list_library(username, None)
        );

        let chats = chats.unwrap_or_else(|e| {
            tracing::error!("Failed to load chats for {}: {}", username, e);
            Vec::new()
        });
        let library_items = library.unwrap_or_else(|e| {
            tracing::error!("Failed to load library for {}: {}", username, e);
            Vec::new()
        });

        tracing::info!(
            "User {} logged in with {} chats and {} library items",
            username,
            chats.len(),
            library_items.len()
        );

        Ok(LoginResult {
            user,
            chats,
            library_items,
        })
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount> {
        let existing = self
            .action(
                "findOne",
                USERS,
                json!({ "filter": { "$or": [ { "username": username }, { "email": email } ] } }),
            )
            .await?;

        if existing.get("document").is_some_and(|doc| !doc.is_null()) {
            return Err(PersistError::UserExists);
        }

        let now = Utc::now().to_rfc3339();
        let inserted = self
            .action(
                "insertOne",
                USERS,
                json!({
                    "document": {
                        "username": username,
                        "email": email,
                        "password": password,
                        "createdAt": now,
                        "updatedAt": now,
                    }
                }),
            )
            .await?;

        Ok(UserAccount {
            id: inserted.get("insertedId").and_then(object_id_string),
            username: username.to_string(),
            email: Some(email.to_string()),
        })
    }

    async fn list_chats(&self, username: &str, limit: Option<i64>) -> Result<Vec<ChatDocument>> {
        self.find_many(CHATS, username, "updatedAt", limit.unwrap_or(self.chat_limit)).await
    }

    async fn upsert_chat(&self, chat: &ChatDocument) -> Result<()> {
        let mut fields = serde_json::to_value(chat)?;
        if let Some(map) = fields.as_object_mut() {
            map.remove("_id");
        }

        self.action(
            "updateOne",
            CHATS,
            json!({
                "filter": { "_id": chat.id },
                "update": { "$set": fields },
                "upsert": true,
            }),
        )
        .await?;

        tracing::debug!("Saved chat {} for {}", chat.id, chat.username);
        Ok(())
    }

    async fn delete_chat(&self, chat_id: &str, username: &str) -> Result<()> {
        self.action(
            "deleteOne",
            CHATS,
            json!({ "filter": { "_id": chat_id, "username": username } }),
        )
        .await?;
        Ok(())
    }

    async fn list_library(&self, username: &str, limit: Option<i64>) -> Result<Vec<LibraryItemDocument>> {
        self.find_many(LIBRARY, username, "createdAt", limit.unwrap_or(self.library_limit)).await
    }

    async fn save_library_item(&self, item: &LibraryItemDocument) -> Result<String> {
        let document = serde_json::to_value(item)?;
        let inserted = self
            .action("insertOne", LIBRARY, json!({ "document": document }))
            .await?;

        inserted
            .get("insertedId")
            .and_then(object_id_string)
            .or_else(|| item.id.clone())
            .ok_or_else(|| PersistError::InvalidPayload("insertOne returned no id".to_string()))
    }

    async fn delete_library_item(&self, item_id: &str, username: &str) -> Result<()> {
        self.action(
            "deleteOne",
            LIBRARY,
            json!({ "filter": { "_id": item_id, "username": username } }),
        )
        .await?;
        Ok(())
    }
}
