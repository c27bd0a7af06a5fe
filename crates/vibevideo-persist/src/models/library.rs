use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vibevideo_types::{MediaFile, MediaItem};

use crate::error::{PersistError, Result};

/// A file saved to the user's library, independent of any conversation.
/// The payload is stored as a data URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItemDocument {
    #[serde(rename = "_id", default, deserialize_with = "super::deserialize_object_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub file_data: String,
    pub original_name: String,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LibraryItemDocument {
    /// New document with a fresh string id, ready to insert
    pub fn from_media_item(username: impl Into<String>, item: &MediaItem) -> Self {
        let now = Utc::now();
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            username: username.into(),
            file_name: item.name.clone(),
            file_type: item.kind.as_str().to_string(),
            file_size: item.size,
            file_data: format!("data:{};base64,{}", item.mime_type, STANDARD.encode(item.data())),
            original_name: item.name.clone(),
            mime_type: item.mime_type.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Decode the stored payload back into a file
    pub fn to_media_file(&self) -> Result<MediaFile> {
        let encoded = match self.file_data.split_once(";base64,") {
            Some((_, body)) => body,
            None => self.file_data.as_str(),
        };
        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| PersistError::InvalidPayload(format!("{}: {}", self.file_name, e)))?;
        Ok(MediaFile::new(self.file_name.clone(), self.mime_type.clone(), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vibevideo_types::{MediaId, MediaKind};

    #[test]
    fn test_library_item_stores_data_url() {
        let item = MediaItem::new(
            MediaId(4),
            MediaKind::Video,
            MediaFile::new("clip.mp4", "video/mp4", vec![0u8, 1, 2]),
        );
        let doc = LibraryItemDocument::from_media_item("carol", &item);

        assert!(doc.id.is_some());
        assert_eq!(doc.file_type, "video");
        assert_eq!(doc.file_data, "data:video/mp4;base64,AAEC");

        let file = doc.to_media_file().unwrap();
        assert_eq!(&*file.data, &[0u8, 1, 2]);
        assert_eq!(file.mime_type, "video/mp4");
    }

    #[test]
    fn test_extended_json_id_is_accepted() {
        let json = serde_json::json!({
            "_id": {"$oid": "65f0c0ffee"},
            "username": "carol",
            "fileName": "a.mp3",
            "fileType": "audio",
            "fileSize": 3,
            "fileData": "AAEC",
            "originalName": "a.mp3",
            "mimeType": "audio/mpeg",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        let doc: LibraryItemDocument = serde_json::from_value(json).unwrap();

        assert_eq!(doc.id.as_deref(), Some("65f0c0ffee"));
        assert_eq!(doc.to_media_file().unwrap().size(), 3);
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let mut doc = LibraryItemDocument::from_media_item(
            "carol",
            &MediaItem::new(MediaId(1), MediaKind::Audio, MediaFile::new("a.mp3", "audio/mpeg", vec![1u8])),
        );
        doc.file_data = "data:audio/mpeg;base64,@@@".to_string();

        assert!(matches!(doc.to_media_file(), Err(PersistError::InvalidPayload(_))));
    }
}
