pub mod classify;
pub mod mime;
pub mod disposition;
pub mod payload;
pub mod traits;
pub mod config;
pub mod client;

pub use classify::{classify, classify_file, AUDIO_EXTENSIONS, VIDEO_EXTENSIONS};
pub use mime::{mime_for_file_name, normalize_merged, normalize_single, NormalizedFile};
pub use disposition::filename_from_content_disposition;
pub use payload::ProcessedPayload;
pub use traits::{ChatOutcome, MediaProcessingClient, ProcessOutcome};
pub use config::MediaApiConfig;
pub use client::HttpMediaClient;
