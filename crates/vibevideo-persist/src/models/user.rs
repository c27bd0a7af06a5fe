use serde::{Deserialize, Serialize};

use super::{ChatDocument, LibraryItemDocument};

/// Public part of an account record. Passwords never leave the backend client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "_id", default, deserialize_with = "super::deserialize_object_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Everything a successful login brings back
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserAccount,
    pub chats: Vec<ChatDocument>,
    pub library_items: Vec<LibraryItemDocument>,
}
