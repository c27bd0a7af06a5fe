use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ids::MediaId;

/// Gallery a media item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    /// Payload could not be classified; kept so it can still be downloaded
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        }
    }
}

/// Canonical in-memory file: every upload and every decoded processing
/// payload ends up in this shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    #[serde(with = "base64_bytes")]
    pub data: Arc<[u8]>,
}

impl MediaFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: Arc::from(data.into()),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A classified handle to an audio or video artifact shown in a gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    pub kind: MediaKind,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub upload_time: DateTime<Utc>,
    #[serde(with = "base64_bytes")]
    data: Arc<[u8]>,
}

impl MediaItem {
    /// Build an item from a file. The kind is fixed here and never changes.
    pub fn new(id: MediaId, kind: MediaKind, file: MediaFile) -> Self {
        Self {
            id,
            kind,
            size: file.size(),
            name: file.name,
            mime_type: file.mime_type,
            upload_time: Utc::now(),
            data: file.data,
        }
    }

    /// Payload as a file. Shares the immutable buffer, no copy.
    pub fn file(&self) -> MediaFile {
        MediaFile {
            name: self.name.clone(),
            mime_type: self.mime_type.clone(),
            data: Arc::clone(&self.data),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S: Serializer>(data: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[u8]>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)?;
        Ok(Arc::from(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_copies_file_metadata() {
        let file = MediaFile::new("clip.mp4", "video/mp4", vec![1u8, 2, 3]);
        let item = MediaItem::new(MediaId(7), MediaKind::Video, file);

        assert_eq!(item.name, "clip.mp4");
        assert_eq!(item.size, 3);
        assert_eq!(item.mime_type, "video/mp4");
        assert_eq!(item.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_payload_serialized_as_base64() {
        let file = MediaFile::new("a.wav", "audio/wav", b"abc".to_vec());
        let item = MediaItem::new(MediaId(1), MediaKind::Audio, file);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["data"], "YWJj");
        assert_eq!(json["kind"], "audio");
        assert_eq!(json["mimeType"], "audio/wav");
        assert!(json.get("uploadTime").is_some());
        assert!(json.get("mime_type").is_none());

        let back: MediaItem = serde_json::from_value(json).unwrap();
        assert_eq!(back.data(), b"abc");
        assert_eq!(back.kind, MediaKind::Audio);
    }
}
