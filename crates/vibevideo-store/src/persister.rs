//! Background persistence worker.
//!
//! The store never awaits the database. Jobs go onto one channel and a
//! single task applies them in order, logging failures.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use vibevideo_persist::{ChatDocument, LibraryItemDocument, PersistenceClient};

#[derive(Debug)]
enum PersistJob {
    SaveChat(ChatDocument),
    DeleteChat { chat_id: String, username: String },
    SaveLibraryItem(LibraryItemDocument),
    DeleteLibraryItem { item_id: String, username: String },
    Flush(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct Persister {
    tx: mpsc::UnboundedSender<PersistJob>,
}

impl Persister {
    /// Start the worker on the current tokio runtime. Returns `None` (and
    /// logs) when called outside a runtime.
    pub fn spawn(client: Arc<dyn PersistenceClient>) -> Option<Self> {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!("No async runtime, persistence disabled: {}", e);
                return None;
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        handle.spawn(Self::run(client, rx));
        Some(Self { tx })
    }

    async fn run(client: Arc<dyn PersistenceClient>, mut rx: mpsc::UnboundedReceiver<PersistJob>) {
        while let Some(job) = rx.recv().await {
            match job {
                PersistJob::SaveChat(chat) => {
                    if let Err(e) = client.upsert_chat(&chat).await {
                        tracing::error!("Failed to save chat {}: {}", chat.id, e);
                    }
                }
                PersistJob::DeleteChat { chat_id, username } => {
                    if let Err(e) = client.delete_chat(&chat_id, &username).await {
                        tracing::error!("Failed to delete chat {}: {}", chat_id, e);
                    }
                }
                PersistJob::SaveLibraryItem(item) => {
                    if let Err(e) = client.save_library_item(&item).await {
                        tracing::error!("Failed to save library item {}: {}", item.file_name, e);
                    }
                }
                PersistJob::DeleteLibraryItem { item_id, username } => {
                    if let Err(e) = client.delete_library_item(&item_id, &username).await {
                        tracing::error!("Failed to delete library item {}: {}", item_id, e);
                    }
                }
                PersistJob::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        tracing::debug!("Persister stopped");
    }

    fn submit(&self, job: PersistJob) {
        if self.tx.send(job).is_err() {
            tracing::warn!("Persister is gone, dropping job");
        }
    }

    pub fn save_chat(&self, chat: ChatDocument) {
        self.submit(PersistJob::SaveChat(chat));
    }

    pub fn delete_chat(&self, chat_id: impl Into<String>, username: impl Into<String>) {
        self.submit(PersistJob::DeleteChat {
            chat_id: chat_id.into(),
            username: username.into(),
        });
    }

    pub fn save_library_item(&self, item: LibraryItemDocument) {
        self.submit(PersistJob::SaveLibraryItem(item));
    }

    pub fn delete_library_item(&self, item_id: impl Into<String>, username: impl Into<String>) {
        self.submit(PersistJob::DeleteLibraryItem {
            item_id: item_id.into(),
            username: username.into(),
        });
    }

    /// Wait until every job submitted so far has been applied
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.submit(PersistJob::Flush(done_tx));
        let _ = done_rx.await;
    }
}
