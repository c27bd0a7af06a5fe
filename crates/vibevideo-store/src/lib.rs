pub mod actions;
pub mod controller;
pub mod error;
pub mod handles;
pub mod persister;
pub mod playback;
mod replies;
pub mod request;
pub mod session;
pub mod store;
pub mod upload;

pub use actions::QuickAction;
pub use controller::ChatController;
pub use error::{Result, StoreError};
pub use handles::{HandleRegistry, ObjectHandle};
pub use persister::Persister;
pub use playback::PlaybackPointer;
pub use request::{ChatRequest, IngestOutcome, ProcessingRequest, RequestMode, RequestOrigin};
pub use session::{FileSessionStorage, MemorySessionStorage, SessionStorage, UserSession, SESSION_KEY};
pub use store::ConversationStore;
pub use upload::CurrentUpload;
