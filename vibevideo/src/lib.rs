//! # VibeVideo
//!
//! Core of a conversational media-editing assistant: users chat with a
//! remote media-processing service, upload audio and video, get processed
//! files back into per-conversation galleries, and optionally sync chats and
//! a media library to a document database.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vibevideo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load()?;
//!     init_logging(&config.logging)?;
//!
//!     let controller = AppBuilder::from_config(config).build().await?;
//!
//!     controller
//!         .store()
//!         .lock()
//!         .await
//!         .select_file(MediaFile::new("clip.mp4", "video/mp4", std::fs::read("clip.mp4")?))?;
//!     controller.run_action(QuickAction::SpeedUp).await?;
//!
//!     let store = controller.store().lock().await;
//!     if let Some(conversation) = store.active_conversation() {
//!         for message in &conversation.messages {
//!             println!("{:?}: {}", message.role, message.content);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`vibevideo-types`**: conversations, messages, media items and ids
//! - **`vibevideo-media`**: media-processing client, payload decoding, classification
//! - **`vibevideo-persist`**: persistence backends (Data API, optional MongoDB driver)
//! - **`vibevideo-store`**: the conversation store and its async controller
//!
//! ## Features
//!
//! - `mongodb`: enables the native MongoDB persistence backend

pub mod builder;
pub mod config;
pub mod logging;
pub mod prelude;

pub use builder::AppBuilder;
pub use config::{AppConfig, LoggingConfig, SessionConfig};
pub use logging::init_logging;

pub use vibevideo_types::{
    Attachment, ChatMessage, Conversation, ConversationId, MediaFile, MediaId, MediaItem, MediaKind, MessageId,
    MessageRole,
};

pub use vibevideo_media::{
    classify, classify_file, ChatOutcome, HttpMediaClient, MediaApiConfig, MediaProcessingClient, ProcessOutcome,
    ProcessedPayload,
};

pub use vibevideo_persist::{
    AtlasDataClient, ChatDocument, LibraryItemDocument, LoginResult, PersistError, PersistenceBackend,
    PersistenceClient, PersistenceConfig, UserAccount,
};

#[cfg(feature = "mongodb")]
pub use vibevideo_persist::MongoPersistenceClient;

pub use vibevideo_store::{
    ChatController, ConversationStore, CurrentUpload, FileSessionStorage, IngestOutcome, MemorySessionStorage,
    ObjectHandle, Persister, PlaybackPointer, QuickAction, SessionStorage, StoreError, UserSession,
};
