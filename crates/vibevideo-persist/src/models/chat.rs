use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vibevideo_types::{ChatMessage, Conversation, ConversationId, MediaItem};

/// Stored form of a conversation. The document id is the conversation id,
/// so saving the same conversation twice updates one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub title: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub audio_files: Vec<MediaItem>,
    #[serde(default)]
    pub video_files: Vec<MediaItem>,
    #[serde(default)]
    pub other_files: Vec<MediaItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatDocument {
    pub fn from_conversation(username: impl Into<String>, conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            username: username.into(),
            title: conversation.title.clone(),
            preview: conversation.preview.clone(),
            messages: conversation.messages.clone(),
            audio_files: conversation.audio_files.clone(),
            video_files: conversation.video_files.clone(),
            other_files: conversation.other_files.clone(),
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }

    pub fn into_conversation(self) -> Conversation {
        let mut conversation = Conversation::with_id(ConversationId::from(self.id));
        conversation.created_at = self.created_at;
        conversation.messages = self.messages;
        conversation.audio_files = self.audio_files;
        conversation.video_files = self.video_files;
        conversation.other_files = self.other_files;
        conversation.recompute_metadata();
        if conversation.messages.is_empty() && !self.title.is_empty() {
            conversation.title = self.title;
        }
        conversation.updated_at = self.updated_at;
        conversation
    }
}
