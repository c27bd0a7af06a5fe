use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use vibevideo_media::MediaProcessingClient;
use vibevideo_persist::{PersistenceClient, UserAccount};
use vibevideo_types::MessageRole;

use crate::actions::QuickAction;
use crate::error::{Result, StoreError};
use crate::request::{ChatRequest, IngestOutcome, ProcessingRequest, RequestMode, RequestOrigin};
use crate::session::UserSession;
use crate::store::ConversationStore;

const MERGE_COMMAND: &str = "merge";

enum Outgoing {
    Process(ProcessingRequest),
    Chat(ChatRequest),
}

/// Clears the in-flight flag on every exit path
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Async entry point for a UI: wires the store to its collaborators.
///
/// The store lock is taken only around synchronous store calls and is never
/// held while a network call is pending. At most one primary send runs at a
/// time; a second one is rejected with [`StoreError::Busy`].
#[derive(Clone)]
pub struct ChatController {
    store: Arc<Mutex<ConversationStore>>,
    media: Arc<dyn MediaProcessingClient>,
    persistence: Option<Arc<dyn PersistenceClient>>,
    busy: Arc<AtomicBool>,
}

impl ChatController {
    pub fn new(store: ConversationStore, media: Arc<dyn MediaProcessingClient>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            media,
            persistence: None,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_persistence(mut self, client: Arc<dyn PersistenceClient>) -> Self {
        self.persistence = Some(client);
        self
    }

    pub fn store(&self) -> &Arc<Mutex<ConversationStore>> {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Result<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(Arc::clone(&self.busy)))
            .map_err(|_| StoreError::Busy)
    }

    /// Send typed text. With a file selected it becomes a processing
    /// instruction, otherwise a chat message.
    pub async fn send_message(&self, text: &str) -> Result<IngestOutcome> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::EmptyMessage);
        }
        let _busy = self.try_begin()?;

        let outgoing = {
            let mut store = self.store.lock().await;
            store.append_message(MessageRole::User, text, None)?;
            Self::plan(&store, text, RequestOrigin::Typed)?
        };

        Ok(self.dispatch(outgoing).await)
    }

    /// Run a preset action on the current selection
    pub async fn run_action(&self, action: QuickAction) -> Result<IngestOutcome> {
        if action == QuickAction::Merge {
            return self.merge_selected(None).await;
        }
        let _busy = self.try_begin()?;

        let instruction = action.instruction();
        let outgoing = {
            let mut store = self.store.lock().await;
            store.append_message(MessageRole::User, instruction, None)?;
            Self::plan(&store, instruction, RequestOrigin::QuickAction(instruction.to_string()))?
        };

        Ok(self.dispatch(outgoing).await)
    }

    /// Merge the multi-file selection
    pub async fn merge_selected(&self, order: Option<&str>) -> Result<IngestOutcome> {
        let _busy = self.try_begin()?;

        let request = {
            let mut store = self.store.lock().await;
            let request = store
                .begin_processing(MERGE_COMMAND, RequestOrigin::Merge)?
                .ok_or(StoreError::NothingToMerge)?
                .with_order(order.map(str::to_string));
            store.append_message(MessageRole::User, QuickAction::Merge.instruction(), None)?;
            request
        };

        Ok(self.dispatch(Outgoing::Process(request)).await)
    }

    fn plan(store: &ConversationStore, text: &str, origin: RequestOrigin) -> Result<Outgoing> {
        match store.begin_processing(text, origin.clone())? {
            Some(request) => Ok(Outgoing::Process(request)),
            None => Ok(Outgoing::Chat(store.begin_chat(text, origin)?)),
        }
    }

    async fn dispatch(&self, outgoing: Outgoing) -> IngestOutcome {
        match outgoing {
            Outgoing::Process(request) => {
                let result = match (request.mode(), request.files.first()) {
                    (RequestMode::Merge, _) => {
                        self.media
                            .process_multiple_files(&request.files, MERGE_COMMAND, request.order.as_deref())
                            .await
                    }
                    (RequestMode::Single, Some(file)) => self.media.process_file(file, &request.instruction).await,
                    (RequestMode::Single, None) => Err(anyhow::anyhow!("processing request without a file")),
                };
                self.store.lock().await.ingest_processing_result(&request, result)
            }
            Outgoing::Chat(request) => {
                let result = self.media.send_message(&request.text).await;
                self.store.lock().await.ingest_chat_reply(&request, result)
            }
        }
    }

    fn persistence(&self) -> Result<&Arc<dyn PersistenceClient>> {
        self.persistence.as_ref().ok_or(StoreError::PersistenceUnavailable)
    }

    /// Authenticate and replace local conversations with the stored ones
    pub async fn login(&self, username: &str, password: &str) -> Result<UserSession> {
        let result = self.persistence()?.login(username, password).await?;

        let session = UserSession::new(result.user.username).with_email(result.user.email);
        self.store
            .lock()
            .await
            .login(session.clone(), result.chats, result.library_items);
        Ok(session)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserAccount> {
        let account = self.persistence()?.register(username, email, password).await?;
        tracing::info!("Registered {}", account.username);
        Ok(account)
    }

    /// Pick up a saved session and load its chats. Failures leave the
    /// store in local-only mode.
    pub async fn restore_session(&self) -> Option<UserSession> {
        let session = self.store.lock().await.restore_session()?;
        let Some(client) = self.persistence.as_ref() else {
            return Some(session);
        };

        let (chats, library) = tokio::join!(
            client.list_chats(&session.username, None),
            client.list_library(&session.username, None)
        );
        let chats = match chats {
            Ok(chats) => chats,
            Err(e) => {
                tracing::warn!("Failed to load chats for {}: {}", session.username, e);
                return Some(session);
            }
        };
        let library = library.unwrap_or_else(|e| {
            tracing::warn!("Failed to load library for {}: {}", session.username, e);
            Vec::new()
        });

        self.store.lock().await.login(session.clone(), chats, library);
        Some(session)
    }

    /// Flush pending saves, clear everything, start a fresh conversation
    pub async fn logout(&self) {
        let persister = self.store.lock().await.persister().cloned();
        if let Some(persister) = persister {
            persister.flush().await;
        }

        let mut store = self.store.lock().await;
        store.logout();
        store.bootstrap();
    }

    pub async fn check_health(&self) -> bool {
        self.media.check_health().await
    }
}
