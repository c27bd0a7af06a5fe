// MIME normalization for processed artifacts. The processing server usually
// answers with application/octet-stream, so the playable type has to be
// recovered from file names.

use std::path::Path;
use vibevideo_types::{MediaFile, MediaKind};

use crate::classify::{classify_file, extension};

const DEFAULT_VIDEO_MIME: &str = "video/mp4";
const DEFAULT_AUDIO_MIME: &str = "audio/mp4";

/// Name and MIME type a processed artifact should carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFile {
    pub name: String,
    pub mime_type: String,
}

/// Playback MIME type for a file name, by extension
pub fn mime_for_file_name(file_name: &str) -> Option<&'static str> {
    let mime = match extension(file_name)?.as_str() {
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        _ => return None,
    };
    Some(mime)
}

/// Name and type for the result of processing a single file
///
/// * `content_type` - response Content-Type header, if any
/// * `disposition_name` - filename recovered from Content-Disposition
pub fn normalize_single(
    input: &MediaFile,
    content_type: Option<&str>,
    disposition_name: Option<&str>,
) -> NormalizedFile {
    let probe_name = disposition_name.unwrap_or(&input.name);

    let mime_type = if let Some(mime) = mime_for_file_name(probe_name) {
        mime.to_string()
    } else if let Some(ct) = content_type.filter(|ct| is_media_content_type(ct)) {
        ct.to_string()
    } else {
        input.mime_type.clone()
    };

    NormalizedFile {
        name: format!("processed_{}", input.name),
        mime_type,
    }
}

/// Name and type for the result of merging several files
///
/// Any video input makes the output video; otherwise any audio input makes
/// it audio. The type is taken from the server-provided name when it agrees
/// with that kind, else the kind's default container.
pub fn normalize_merged(inputs: &[MediaFile], disposition_name: Option<&str>) -> NormalizedFile {
    let Some(first) = inputs.first() else {
        return NormalizedFile {
            name: "merged".to_string(),
            mime_type: "application/octet-stream".to_string(),
        };
    };

    let probe_name = disposition_name.unwrap_or(&first.name);
    let by_name = mime_for_file_name(probe_name);
    let stem = Path::new(&first.name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&first.name);

    let has_video = inputs.iter().any(|f| classify_file(f) == MediaKind::Video);
    let has_audio = inputs.iter().any(|f| classify_file(f) == MediaKind::Audio);

    if has_video {
        NormalizedFile {
            name: format!("merged_{}.mp4", stem),
            mime_type: by_name
                .filter(|m| m.starts_with("video/"))
                .unwrap_or(DEFAULT_VIDEO_MIME)
                .to_string(),
        }
    } else if has_audio {
        NormalizedFile {
            name: format!("merged_{}.m4a", stem),
            mime_type: by_name
                .filter(|m| m.starts_with("audio/"))
                .unwrap_or(DEFAULT_AUDIO_MIME)
                .to_string(),
        }
    } else {
        NormalizedFile {
            name: format!("merged_{}", first.name),
            mime_type: by_name
                .map(str::to_string)
                .unwrap_or_else(|| first.mime_type.clone()),
        }
    }
}

pub(crate) fn is_media_content_type(content_type: &str) -> bool {
    ["audio/", "video/", "image/"]
        .iter()
        .any(|prefix| content_type.contains(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, mime: &str) -> MediaFile {
        MediaFile::new(name, mime, vec![0u8; 8])
    }

    #[test]
    fn test_single_uses_disposition_name_first() {
        let input = file("talk.mp4", "video/mp4");
        let out = normalize_single(&input, Some("application/octet-stream"), Some("talk_enhanced.m4a"));

        assert_eq!(out.name, "processed_talk.mp4");
        assert_eq!(out.mime_type, "audio/mp4");
    }

    #[test]
    fn test_single_falls_back_to_content_type_then_input() {
        let input = file("upload", "video/quicktime");

        let out = normalize_single(&input, Some("video/webm"), None);
        assert_eq!(out.mime_type, "video/webm");

        let out = normalize_single(&input, Some("application/octet-stream"), None);
        assert_eq!(out.mime_type, "video/quicktime");
    }

    #[test]
    fn test_merge_with_any_video_is_video() {
        let inputs = vec![file("intro.mp3", "audio/mpeg"), file("scene.mov", "video/quicktime")];
        let out = normalize_merged(&inputs, None);

        assert_eq!(out.name, "merged_intro.mp4");
        assert_eq!(out.mime_type, "video/mp4");
    }

    #[test]
    fn test_merge_of_audio_only() {
        let inputs = vec![file("a.wav", "audio/wav"), file("b.wav", "audio/wav")];

        let out = normalize_merged(&inputs, Some("merged.wav"));
        assert_eq!(out.name, "merged_a.m4a");
        assert_eq!(out.mime_type, "audio/wav");

        let out = normalize_merged(&inputs, Some("merged.mp4"));
        assert_eq!(out.mime_type, "audio/mp4");
    }

    #[test]
    fn test_merge_of_unclassified_inputs() {
        let inputs = vec![file("a.dat", "application/octet-stream")];
        let out = normalize_merged(&inputs, None);

        assert_eq!(out.name, "merged_a.dat");
        assert_eq!(out.mime_type, "application/octet-stream");
    }
}
