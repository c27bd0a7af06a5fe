use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ChatDocument, LibraryItemDocument, LoginResult, UserAccount};

/// Remote storage for accounts, chats and library files.
///
/// Every call is best-effort from the caller's point of view: the store
/// logs failures and keeps working from memory.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Verify credentials and fetch the user's chats and library in one go.
    /// Chat or library lookups that fail come back empty rather than
    /// failing the login.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult>;

    /// Create an account. Fails with `UserExists` when either the username
    /// or the email is taken.
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount>;

    /// Chats for a user, newest first
    async fn list_chats(&self, username: &str, limit: Option<i64>) -> Result<Vec<ChatDocument>>;

    /// Insert or replace a chat keyed by its id
    async fn upsert_chat(&self, chat: &ChatDocument) -> Result<()>;

    async fn delete_chat(&self, chat_id: &str, username: &str) -> Result<()>;

    /// Library items for a user, newest first
    async fn list_library(&self, username: &str, limit: Option<i64>) -> Result<Vec<LibraryItemDocument>>;

    /// Returns the stored id
    async fn save_library_item(&self, item: &LibraryItemDocument) -> Result<String>;

    async fn delete_library_item(&self, item_id: &str, username: &str) -> Result<()>;
}
