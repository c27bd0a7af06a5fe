use async_trait::async_trait;
use mongodb::Client;

use crate::config::MongoConfig;
use crate::dbs::mongo::repositories::{MongoChatRepository, MongoLibraryRepository, MongoUserRepository};
use crate::error::{PersistError, Result};
use crate::models::{ChatDocument, LibraryItemDocument, LoginResult, UserAccount};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    user_repo: MongoUserRepository,
    chat_repo: MongoChatRepository,
    library_repo: MongoLibraryRepository,
    chat_limit: i64,
    library_limit: i64,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, config: &MongoConfig) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            user_repo: MongoUserRepository::new(&client, &config.database),
            chat_repo: MongoChatRepository::new(&client, &config.database),
            library_repo: MongoLibraryRepository::new(&client, &config.database),
            chat_limit: 50,
            library_limit: 100,
        })
    }

    pub fn with_limits(mut self, chat_limit: i64, library_limit: i64) -> Self {
        self.chat_limit = chat_limit;
        self.library_limit = library_limit;
        self
    }
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult> {
        let user = self
            .user_repo
            .find_by_credentials(username, password)
            .await?
            .ok_or(PersistError::InvalidCredentials)?;

        let (chats, library) = tokio::join!(
            self.chat_repo.list_chats(username, self.chat_limit),
            self.library_repo.list_items(username, self.library_limit)
        );

        let chats = chats.unwrap_or_else(|e| {
            tracing::error!("Failed to load chats for {}: {}", username, e);
            Vec::new()
        });
        let library_items = library.unwrap_or_else(|e| {
            tracing::error!("Failed to load library for {}: {}", username, e);
            Vec::new()
        });

        Ok(LoginResult {
            user,
            chats,
            library_items,
        })
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount> {
        if self.user_repo.exists(username, email).await? {
            return Err(PersistError::UserExists);
        }
        self.user_repo.insert(username, email, password).await
    }

    async fn list_chats(&self, username: &str, limit: Option<i64>) -> Result<Vec<ChatDocument>> {
        self.chat_repo
            .list_chats(username, limit.unwrap_or(self.chat_limit))
            .await
    }

    async fn upsert_chat(&self, chat: &ChatDocument) -> Result<()> {
        self.chat_repo.upsert_chat(chat).await
    }

    async fn delete_chat(&self, chat_id: &str, username: &str) -> Result<()> {
        self.chat_repo.delete_chat(chat_id, username).await
    }

    async fn list_library(&self, username: &str, limit: Option<i64>) -> Result<Vec<LibraryItemDocument>> {
        self.library_repo
            .list_items(username, limit.unwrap_or(self.library_limit))
            .await
    }

    async fn save_library_item(&self, item: &LibraryItemDocument) -> Result<String> {
        self.library_repo.insert_item(item).await
    }

    async fn delete_library_item(&self, item_id: &str, username: &str) -> Result<()> {
        self.library_repo.delete_item(item_id, username).await
    }
}
