// Two-stage media classification: declared MIME type first, file extension
// as fallback. Pure functions so the store and the client agree.

use std::path::Path;
use vibevideo_types::{MediaFile, MediaKind};

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg", "aac"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "webm", "mkv"];

/// Classify a payload as audio, video or unknown
///
/// Precedence: a MIME type of `audio/*` or `video/*` decides on its own.
/// Any other (or missing) MIME type falls back to matching the file
/// extension, case-insensitively, against the fixed audio and video sets.
pub fn classify(mime_type: Option<&str>, file_name: &str) -> MediaKind {
    if let Some(mime) = mime_type.map(str::trim).filter(|m| !m.is_empty()) {
        let mime = mime.to_ascii_lowercase();
        if mime.starts_with("audio/") {
            return MediaKind::Audio;
        }
        if mime.starts_with("video/") {
            return MediaKind::Video;
        }
    }

    match extension(file_name) {
        Some(ext) if AUDIO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Audio,
        Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => MediaKind::Video,
        _ => MediaKind::Unknown,
    }
}

pub fn classify_file(file: &MediaFile) -> MediaKind {
    classify(Some(&file.mime_type), &file.name)
}

pub(crate) fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_wins_over_extension() {
        assert_eq!(classify(Some("audio/mpeg"), "clip.mp4"), MediaKind::Audio);
        assert_eq!(classify(Some("video/mp4"), "song.mp3"), MediaKind::Video);
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(classify(Some("application/octet-stream"), "take.WAV"), MediaKind::Audio);
        assert_eq!(classify(None, "movie.MKV"), MediaKind::Video);
        assert_eq!(classify(Some(""), "voice.m4a"), MediaKind::Audio);
        assert_eq!(classify(Some("image/png"), "still.webm"), MediaKind::Video);
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        assert_eq!(classify(Some("application/pdf"), "notes.pdf"), MediaKind::Unknown);
        assert_eq!(classify(None, "no_extension"), MediaKind::Unknown);
        assert_eq!(classify(None, "mp3"), MediaKind::Unknown);
    }

    #[test]
    fn test_classification_is_stable() {
        let file = MediaFile::new("processed_clip.mov", "application/octet-stream", vec![0u8; 4]);
        let first = classify_file(&file);
        for _ in 0..3 {
            assert_eq!(classify_file(&file), first);
        }
        assert_eq!(first, MediaKind::Video);
    }
}
