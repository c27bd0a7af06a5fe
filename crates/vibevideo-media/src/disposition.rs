/// Extract the filename parameter from a Content-Disposition header
///
/// Accepts quoted and bare values as well as the RFC 5987 `filename*=`
/// form (`UTF-8''name.mp4`). The result is lower-cased since it is only
/// used for extension matching.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    for param in header.split(';') {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if !key.starts_with("filename") {
            continue;
        }

        let mut value = value.trim();
        if key == "filename*" {
            if let Some((_, rest)) = value.split_once("''") {
                value = rest;
            }
        }

        let cleaned = value.trim_matches(|c| c == '"' || c == '\'').trim();
        if !cleaned.is_empty() {
            return Some(cleaned.to_lowercase());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_filename() {
        let header = r#"attachment; filename="Processed_Clip.MP4""#;
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("processed_clip.mp4"));
    }

    #[test]
    fn test_bare_filename() {
        let header = "attachment; filename=out.m4a; size=1024";
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("out.m4a"));
    }

    #[test]
    fn test_extended_filename() {
        let header = "attachment; filename*=UTF-8''merged.webm";
        assert_eq!(filename_from_content_disposition(header).as_deref(), Some("merged.webm"));
    }

    #[test]
    fn test_missing_filename() {
        assert_eq!(filename_from_content_disposition("inline"), None);
        assert_eq!(filename_from_content_disposition("attachment; filename=\"\""), None);
    }
}
