use thiserror::Error;
use vibevideo_types::{ConversationId, MediaId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Media item not found: {0}")]
    MediaNotFound(MediaId),

    #[error("No active conversation")]
    NoActiveConversation,

    #[error("A request is already in progress")]
    Busy,

    #[error("Select at least two files to merge")]
    NothingToMerge,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("No files selected")]
    EmptySelection,

    #[error("Library item not found: {0}")]
    LibraryItemNotFound(String),

    #[error("Persistence is not configured")]
    PersistenceUnavailable,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Persistence error: {0}")]
    Persist(#[from] vibevideo_persist::PersistError),

    #[error("Session storage error: {0}")]
    Session(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
