//! Prelude module for convenient imports
//!
//! ```rust
//! use vibevideo::prelude::*;
//! ```

pub use crate::{
    init_logging, AppBuilder, AppConfig,
    ChatController, ConversationStore, CurrentUpload, IngestOutcome, QuickAction, StoreError,
    Conversation, ConversationId, ChatMessage, MessageRole, MediaFile, MediaId, MediaItem, MediaKind,
    MediaProcessingClient, ChatOutcome, ProcessOutcome,
    PersistenceClient, UserSession,
};
