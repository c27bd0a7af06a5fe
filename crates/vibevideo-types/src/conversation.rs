use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ConversationId, MediaId};
use crate::media::{MediaItem, MediaKind};
use crate::message::ChatMessage;

const DEFAULT_TITLE: &str = "New Chat";
const TITLE_MAX_CHARS: usize = 40;
const PREVIEW_MAX_CHARS: usize = 60;

/// An isolated chat session: message log plus its own media galleries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub title: String,
    pub preview: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub audio_files: Vec<MediaItem>,
    #[serde(default)]
    pub video_files: Vec<MediaItem>,
    /// Payloads that could not be classified as audio or video
    #[serde(default)]
    pub other_files: Vec<MediaItem>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(ConversationId::new())
    }

    pub fn with_id(id: ConversationId) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: DEFAULT_TITLE.to_string(),
            preview: String::new(),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
            audio_files: Vec::new(),
            video_files: Vec::new(),
            other_files: Vec::new(),
        }
    }

    /// Append and refresh title/preview
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.recompute_metadata();
    }

    pub fn recompute_metadata(&mut self) {
        self.title = self
            .messages
            .iter()
            .find(|m| m.is_user())
            .map(|m| truncate(&m.content, TITLE_MAX_CHARS))
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        self.preview = self
            .messages
            .last()
            .map(|m| truncate(&m.content, PREVIEW_MAX_CHARS))
            .unwrap_or_default();
        self.updated_at = Utc::now();
    }

    pub fn gallery_mut(&mut self, kind: MediaKind) -> &mut Vec<MediaItem> {
        match kind {
            MediaKind::Audio => &mut self.audio_files,
            MediaKind::Video => &mut self.video_files,
            MediaKind::Unknown => &mut self.other_files,
        }
    }

    pub fn find_media(&self, id: MediaId) -> Option<&MediaItem> {
        self.media_items().find(|item| item.id == id)
    }

    /// Remove by id from whichever gallery holds it
    pub fn remove_media(&mut self, id: MediaId) -> Option<MediaItem> {
        for kind in [MediaKind::Audio, MediaKind::Video, MediaKind::Unknown] {
            let gallery = self.gallery_mut(kind);
            if let Some(pos) = gallery.iter().position(|item| item.id == id) {
                return Some(gallery.remove(pos));
            }
        }
        None
    }

    pub fn media_items(&self) -> impl Iterator<Item = &MediaItem> {
        self.audio_files
            .iter()
            .chain(self.video_files.iter())
            .chain(self.other_files.iter())
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head.trim_end())
    }
}
