use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the media-processing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaApiConfig {
    pub base_url: String,
    #[serde(default = "default_chat_timeout")]
    pub chat_timeout_secs: u64,
    #[serde(default = "default_process_timeout")]
    pub process_timeout_secs: u64,
    #[serde(default = "default_merge_timeout")]
    pub merge_timeout_secs: u64,
    #[serde(default = "default_health_timeout")]
    pub health_timeout_secs: u64,
    /// Uploads above this size are rejected before any request is made
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: u64,
}

fn default_chat_timeout() -> u64 {
    30
}

fn default_process_timeout() -> u64 {
    60
}

fn default_merge_timeout() -> u64 {
    180
}

fn default_health_timeout() -> u64 {
    5
}

fn default_max_upload_mb() -> u64 {
    100
}

impl Default for MediaApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            chat_timeout_secs: default_chat_timeout(),
            process_timeout_secs: default_process_timeout(),
            merge_timeout_secs: default_merge_timeout(),
            health_timeout_secs: default_health_timeout(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

impl MediaApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_max_upload_mb(mut self, mb: u64) -> Self {
        self.max_upload_mb = mb;
        self
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }

    pub fn merge_timeout(&self) -> Duration {
        Duration::from_secs(self.merge_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}
