use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{MediaId, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Processed media referenced by an assistant message for download/preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub media_id: MediaId,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp: Utc::now(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == MessageRole::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_keys_are_camel_case() {
        let message = ChatMessage::new(3, MessageRole::Assistant, "done").with_attachment(Attachment {
            media_id: MediaId(9),
            file_name: "out.mp4".to_string(),
        });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["attachment"]["mediaId"], 9);
        assert_eq!(json["attachment"]["fileName"], "out.mp4");

        let back: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back.attachment.unwrap().media_id, MediaId(9));
    }
}
