pub mod ids;
pub mod media;
pub mod message;
pub mod conversation;

pub use ids::{ConversationId, MediaId, MessageId};
pub use media::{MediaFile, MediaItem, MediaKind};
pub use message::{Attachment, ChatMessage, MessageRole};
pub use conversation::Conversation;
