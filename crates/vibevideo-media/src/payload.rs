use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use vibevideo_types::MediaFile;

use crate::mime::{is_media_content_type, mime_for_file_name};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Shapes a processed artifact can arrive in
///
/// Decoded exactly once, at the client boundary, into a [`MediaFile`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedPayload {
    /// Raw response body
    Binary(MediaFile),
    /// JSON body pointing at a downloadable file
    RemoteUrl {
        url: String,
        /// `type` field of the JSON body
        mime_type: Option<String>,
        /// Used only when nothing else identifies the file
        fallback_mime: Option<String>,
        name: String,
    },
    /// JSON body carrying base64 data, bare or as a `data:` URL
    Inline {
        base64: String,
        mime_type: Option<String>,
        fallback_mime: Option<String>,
        name: String,
    },
}

impl ProcessedPayload {
    /// Recognise a payload inside a JSON response body
    ///
    /// `fallback_mime` is usually the uploaded file's type. It only applies
    /// when neither the body, the payload itself nor the file name says
    /// what the artifact is.
    ///
    /// Returns `None` when the body carries neither `url` nor `base64`/`data`,
    /// i.e. the server reported success without an artifact.
    pub fn from_json(body: &Value, fallback_mime: Option<&str>, default_name: &str) -> Option<Self> {
        let mime_type = body
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let fallback_mime = fallback_mime.map(str::to_string);
        let name = body
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(default_name)
            .to_string();

        if let Some(url) = body.get("url").and_then(Value::as_str) {
            return Some(Self::RemoteUrl {
                url: url.to_string(),
                mime_type,
                fallback_mime,
                name,
            });
        }

        body.get("base64")
            .or_else(|| body.get("data"))
            .and_then(Value::as_str)
            .map(|data| Self::Inline {
                base64: data.to_string(),
                mime_type,
                fallback_mime,
                name,
            })
    }

    /// Normalize into the canonical in-memory file
    pub async fn into_media_file(self, http: &reqwest::Client) -> Result<MediaFile> {
        match self {
            Self::Binary(file) => Ok(file),
            Self::RemoteUrl {
                url,
                mime_type,
                fallback_mime,
                name,
            } => {
                tracing::debug!("Fetching processed file from {}", url);
                let response = http
                    .get(&url)
                    .send()
                    .await
                    .with_context(|| format!("Failed to fetch processed file from {}", url))?
                    .error_for_status()
                    .context("Processed file URL returned an error status")?;

                let header_mime = response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                let data = response
                    .bytes()
                    .await
                    .context("Failed to read processed file body")?;

                let mime = resolve_mime(mime_type, header_mime, &name, fallback_mime);
                Ok(MediaFile::new(name, mime, data.to_vec()))
            }
            Self::Inline {
                base64,
                mime_type,
                fallback_mime,
                name,
            } => decode_inline(&base64, mime_type, fallback_mime, name),
        }
    }
}

/// Pick the artifact's type, strongest source first: the declared type, a
/// media type carried by the payload (data URL header or fetched
/// Content-Type), the file name, then the fallback.
fn resolve_mime(
    declared: Option<String>,
    carried: Option<String>,
    name: &str,
    fallback: Option<String>,
) -> String {
    let carried = carried
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_string())
        .filter(|ct| is_media_content_type(ct));

    declared
        .or(carried)
        .or_else(|| mime_for_file_name(name).map(str::to_string))
        .or(fallback)
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

/// Decode bare base64 or a `data:<mime>;base64,<data>` URL
pub fn decode_inline(
    encoded: &str,
    mime_type: Option<String>,
    fallback_mime: Option<String>,
    name: String,
) -> Result<MediaFile> {
    let (url_mime, payload) = match encoded.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest
                .split_once(',')
                .ok_or_else(|| anyhow!("Malformed data URL: missing ','"))?;
            let mime = header
                .split(';')
                .next()
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            (mime, data)
        }
        None => (None, encoded),
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .context("Invalid base64 payload")?;

    let mime = resolve_mime(mime_type, url_mime, &name, fallback_mime);
    Ok(MediaFile::new(name, mime, bytes))
}
