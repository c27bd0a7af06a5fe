use vibevideo_types::{ConversationId, MediaFile, MediaId};

/// Where an outgoing request came from. Only affects message wording and
/// which selection the result may clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOrigin {
    /// Free text typed by the user
    Typed,
    /// One of the quick-action buttons; carries its instruction text
    QuickAction(String),
    /// Multi-file merge
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Single,
    Merge,
}

/// Snapshot taken when a processing request is issued. The result is routed
/// by `conversation_id`, whatever conversation is active when it arrives.
#[derive(Debug, Clone)]
pub struct ProcessingRequest {
    pub conversation_id: ConversationId,
    pub instruction: String,
    pub origin: RequestOrigin,
    pub files: Vec<MediaFile>,
    /// Gallery item the single input came from
    pub source: Option<MediaId>,
    /// Merge order hint passed through to the server
    pub order: Option<String>,
}

impl ProcessingRequest {
    pub fn with_order(mut self, order: Option<String>) -> Self {
        self.order = order;
        self
    }

    pub fn mode(&self) -> RequestMode {
        match self.origin {
            RequestOrigin::Merge => RequestMode::Merge,
            _ => RequestMode::Single,
        }
    }
}

/// Snapshot for a plain chat message (no file attached)
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub conversation_id: ConversationId,
    pub text: String,
    pub origin: RequestOrigin,
}

/// What an ingest call did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Payload classified and added to the captured conversation
    MediaAdded(MediaId),
    /// Success without artifact; a retry hint was appended
    EmptyResult,
    /// Error message appended, galleries untouched
    Failed,
    /// Assistant reply appended
    Replied,
    /// Captured conversation no longer exists; nothing changed
    Stale,
}
