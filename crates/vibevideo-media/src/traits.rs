use anyhow::Result;
use async_trait::async_trait;
use vibevideo_types::MediaFile;

/// Result of a processing call that reached the server
///
/// Transport failures (unreachable host, timeouts) are reported as `Err`
/// by [`MediaProcessingClient`] instead.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// Server returned an artifact
    Processed { file: MediaFile, message: String },
    /// Server reported success but returned no artifact (retriable)
    Empty { message: String },
    /// Server or pre-flight validation rejected the request
    Failed { error: String },
}

impl ProcessOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }
}

/// Result of a plain chat message (no file attached)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    Reply(String),
    /// Accepted, but the server sent no reply text
    Acknowledged,
    Failed(String),
}

/// Remote media-processing API
#[async_trait]
pub trait MediaProcessingClient: Send + Sync {
    /// Send a text-only message
    async fn send_message(&self, text: &str) -> Result<ChatOutcome>;

    /// Process one file according to a natural-language instruction
    async fn process_file(&self, file: &MediaFile, instruction: &str) -> Result<ProcessOutcome>;

    /// Process several files together (merge)
    async fn process_multiple_files(
        &self,
        files: &[MediaFile],
        command: &str,
        order: Option<&str>,
    ) -> Result<ProcessOutcome>;

    /// Whether the API answers its health endpoint
    async fn check_health(&self) -> bool;
}
