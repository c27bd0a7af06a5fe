// HTTP implementation of the media-processing API (reqwest, no SDK)

use crate::config::MediaApiConfig;
use crate::disposition::filename_from_content_disposition;
use crate::mime::{normalize_merged, normalize_single};
use crate::payload::ProcessedPayload;
use crate::traits::{ChatOutcome, MediaProcessingClient, ProcessOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use vibevideo_types::MediaFile;

const ALLOWED_UPLOAD_PREFIXES: &[&str] = &["audio/", "video/", "image/"];
const DEFAULT_PROCESSED_MESSAGE: &str = "File processed successfully!";
const DEFAULT_MERGED_MESSAGE: &str = "Files merged successfully!";

/// Media API client over plain HTTP
pub struct HttpMediaClient {
    http_client: reqwest::Client,
    base_url: String,
    config: MediaApiConfig,
}

impl HttpMediaClient {
    pub fn new(config: MediaApiConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    pub fn config(&self) -> &MediaApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Pre-flight checks; `Some(reason)` means the upload is rejected
    fn validate_upload(&self, file: &MediaFile) -> Option<String> {
        let allowed = ALLOWED_UPLOAD_PREFIXES
            .iter()
            .any(|prefix| file.mime_type.starts_with(prefix));
        if !allowed {
            return Some(format!(
                "Unsupported file type: {}. Please upload audio, video, or image files.",
                file.mime_type
            ));
        }
        if file.size() > self.config.max_upload_bytes() {
            return Some(format!(
                "File too large. Please upload files smaller than {}MB.",
                self.config.max_upload_mb
            ));
        }
        None
    }

    fn file_part(file: &MediaFile) -> Result<Part> {
        let mime = if file.mime_type.is_empty() {
            "application/octet-stream"
        } else {
            file.mime_type.as_str()
        };
        Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(mime)
            .with_context(|| format!("Invalid MIME type for upload: {}", mime))
    }

    fn merge_form(files: &[MediaFile], field: &str, command_field: &str, command: &str, order: Option<&str>) -> Result<Form> {
        let mut form = Form::new();
        for file in files {
            form = form.part(field.to_string(), Self::file_part(file)?);
        }
        form = form.text(command_field.to_string(), command.to_string());
        if let Some(order) = order {
            form = form.text("order", order.to_string());
        }
        Ok(form)
    }

    async fn post_merge(&self, files: &[MediaFile], command: &str, order: Option<&str>) -> Result<Response> {
        tracing::debug!("Trying /merge endpoint");
        let form = Self::merge_form(files, "files", "message", command, order)?;
        self.http_client
            .post(self.url("/merge"))
            .multipart(form)
            .timeout(self.config.merge_timeout())
            .send()
            .await
            .context("Failed to send /merge request")
    }

    async fn post_process_merge(&self, files: &[MediaFile], command: &str, order: Option<&str>) -> Result<Response> {
        tracing::debug!("Trying /process endpoint with command={}", command);
        let form = Self::merge_form(files, "file", "command", command, order)?;
        self.http_client
            .post(self.url("/process"))
            .multipart(form)
            .timeout(self.config.merge_timeout())
            .send()
            .await
            .context("Failed to send /process merge request")
    }

    /// Error body as text, preferring a JSON `detail` field when present
    async fn error_detail(response: Response) -> String {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());

        serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text)
    }

    fn header(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    async fn read_process_response(&self, response: Response, input: &MediaFile) -> Result<ProcessOutcome> {
        let status = response.status();
        if !status.is_success() {
            let detail = Self::error_detail(response).await;
            tracing::error!("File processing error: status={}, body={}", status, detail);
            return Ok(ProcessOutcome::failed(format!(
                "Processing error: {} - {}",
                status.as_u16(),
                detail
            )));
        }

        let content_type = Self::header(&response, CONTENT_TYPE);
        let disposition = Self::header(&response, CONTENT_DISPOSITION);

        if content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
        {
            let body: Value = response
                .json()
                .await
                .context("Failed to parse JSON processing response")?;

            if let Some(error) = body.get("error") {
                let error = error
                    .as_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                return Ok(ProcessOutcome::failed(format!("API Error: {}", error)));
            }

            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_PROCESSED_MESSAGE)
                .to_string();
            let default_name = format!("processed_{}", input.name);

            return match ProcessedPayload::from_json(&body, Some(input.mime_type.as_str()), &default_name) {
                Some(payload) => {
                    let file = payload.into_media_file(&self.http_client).await?;
                    Ok(ProcessOutcome::Processed { file, message })
                }
                None => Ok(ProcessOutcome::Empty { message }),
            };
        }

        let data = response
            .bytes()
            .await
            .context("Failed to read processed file body")?;

        tracing::debug!(
            "Received file from backend: size={}, content_type={:?}, disposition={:?}",
            data.len(),
            content_type,
            disposition
        );

        if data.is_empty() {
            return Ok(ProcessOutcome::failed(
                "Received empty file from server. Processing may have failed.",
            ));
        }

        let disposition_name = disposition
            .as_deref()
            .and_then(filename_from_content_disposition);
        let normalized = normalize_single(input, content_type.as_deref(), disposition_name.as_deref());
        let file = ProcessedPayload::Binary(MediaFile::new(normalized.name, normalized.mime_type, data.to_vec()))
            .into_media_file(&self.http_client)
            .await?;

        Ok(ProcessOutcome::Processed {
            file,
            message: DEFAULT_PROCESSED_MESSAGE.to_string(),
        })
    }
}

#[async_trait]
impl MediaProcessingClient for HttpMediaClient {
    async fn send_message(&self, text: &str) -> Result<ChatOutcome> {
        let response = self
            .http_client
            .post(self.url("/chat"))
            .form(&[("message", text)])
            .timeout(self.config.chat_timeout())
            .send()
            .await
            .context("Failed to send chat message")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!("Chat API error: status={}, body={}", status, detail);
            return Ok(ChatOutcome::Failed(format!("API Error: {} - {}", status.as_u16(), detail)));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse chat response")?;

        let reply = body
            .get("message")
            .or_else(|| body.get("response"))
            .and_then(Value::as_str);

        Ok(match reply {
            Some(reply) => ChatOutcome::Reply(reply.to_string()),
            None => ChatOutcome::Acknowledged,
        })
    }

    async fn process_file(&self, file: &MediaFile, instruction: &str) -> Result<ProcessOutcome> {
        if let Some(reason) = self.validate_upload(file) {
            tracing::warn!("Rejected upload {}: {}", file.name, reason);
            return Ok(ProcessOutcome::failed(reason));
        }

        tracing::info!("Processing {} ({} bytes): {}", file.name, file.size(), instruction);

        let form = Form::new()
            .part("file", Self::file_part(file)?)
            .text("message", instruction.to_string());

        let response = self
            .http_client
            .post(self.url("/process"))
            .multipart(form)
            .timeout(self.config.process_timeout())
            .send()
            .await
            .context("Failed to send /process request")?;

        self.read_process_response(response, file).await
    }

    async fn process_multiple_files(
        &self,
        files: &[MediaFile],
        command: &str,
        order: Option<&str>,
    ) -> Result<ProcessOutcome> {
        if files.is_empty() {
            return Ok(ProcessOutcome::failed("No files selected for merging"));
        }

        tracing::info!("Processing {} files with command={}", files.len(), command);

        let response = match self.post_merge(files, command, order).await {
            Ok(response) if response.status() != StatusCode::NOT_FOUND => response,
            Ok(_) => {
                tracing::info!("Merge endpoint not available, falling back to /process");
                self.post_process_merge(files, command, order).await?
            }
            Err(e) => {
                tracing::warn!("Merge endpoint failed ({}), falling back to /process", e);
                self.post_process_merge(files, command, order).await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            let detail = Self::error_detail(response).await;
            tracing::error!("Merge processing error: status={}, body={}", status, detail);
            return Ok(ProcessOutcome::failed(format!(
                "Merge failed: {} - {}",
                status.as_u16(),
                detail
            )));
        }

        let disposition = Self::header(&response, CONTENT_DISPOSITION);
        let data = response
            .bytes()
            .await
            .context("Failed to read merged file body")?;

        if data.is_empty() {
            return Ok(ProcessOutcome::failed(
                "Received empty file from server. Merge may have failed.",
            ));
        }

        let disposition_name = disposition
            .as_deref()
            .and_then(filename_from_content_disposition);
        let normalized = normalize_merged(files, disposition_name.as_deref());

        Ok(ProcessOutcome::Processed {
            file: MediaFile::new(normalized.name, normalized.mime_type, data.to_vec()),
            message: DEFAULT_MERGED_MESSAGE.to_string(),
        })
    }

    async fn check_health(&self) -> bool {
        match self
            .http_client
            .get(self.url("/health"))
            .timeout(self.config.health_timeout())
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
