use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use vibevideo_media::{classify_file, ChatOutcome, ProcessOutcome};
use vibevideo_persist::{ChatDocument, LibraryItemDocument};
use vibevideo_types::{
    Attachment, ChatMessage, Conversation, ConversationId, MediaFile, MediaId, MediaItem, MessageId, MessageRole,
};

use crate::error::{Result, StoreError};
use crate::handles::{HandleRegistry, ObjectHandle};
use crate::persister::Persister;
use crate::playback::PlaybackPointer;
use crate::replies;
use crate::request::{ChatRequest, IngestOutcome, ProcessingRequest, RequestMode, RequestOrigin};
use crate::session::{SessionStorage, UserSession};
use crate::upload::CurrentUpload;

/// Single source of truth for conversations, their galleries, the playback
/// pointer and the pending upload.
///
/// All methods are synchronous. Network work happens outside the store:
/// callers take a request snapshot (`begin_processing`, `begin_chat`), await
/// the collaborator without holding the store, then hand the result back
/// through `ingest_processing_result` / `ingest_chat_reply`.
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: Option<ConversationId>,
    playback: PlaybackPointer,
    upload: CurrentUpload,
    handles: HandleRegistry,
    library: Vec<LibraryItemDocument>,
    session: Option<UserSession>,
    session_storage: Option<Arc<dyn SessionStorage>>,
    persister: Option<Persister>,
    next_media_id: u64,
    last_message_id: MessageId,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: Vec::new(),
            active: None,
            playback: PlaybackPointer::default(),
            upload: CurrentUpload::None,
            handles: HandleRegistry::new(),
            library: Vec::new(),
            session: None,
            session_storage: None,
            persister: None,
            next_media_id: 0,
            last_message_id: 0,
        }
    }

    pub fn with_persister(mut self, persister: Persister) -> Self {
        self.persister = Some(persister);
        self
    }

    pub fn with_session_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.session_storage = Some(storage);
        self
    }

    // ---- read access ----

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    pub fn active_id(&self) -> Option<&ConversationId> {
        self.active.as_ref()
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active.as_ref().and_then(|id| self.conversation(id))
    }

    pub fn playback(&self) -> &PlaybackPointer {
        &self.playback
    }

    pub fn currently_playing_id(&self) -> Option<MediaId> {
        self.playback.currently_playing_id()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn current_upload(&self) -> &CurrentUpload {
        &self.upload
    }

    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn library(&self) -> &[LibraryItemDocument] {
        &self.library
    }

    pub fn persister(&self) -> Option<&Persister> {
        self.persister.as_ref()
    }

    /// Look an item up in any conversation
    pub fn find_media(&self, id: MediaId) -> Option<(&ConversationId, &MediaItem)> {
        self.conversations
            .iter()
            .find_map(|c| c.find_media(id).map(|item| (&c.id, item)))
    }

    // ---- conversations ----

    /// Make sure one conversation exists and is active
    pub fn bootstrap(&mut self) -> ConversationId {
        if let Some(active) = self.active.clone() {
            if self.conversation(&active).is_some() {
                return active;
            }
        }
        match self.conversations.first().map(|c| c.id.clone()) {
            Some(first) => {
                self.activate(first.clone());
                first
            }
            None => self.create_conversation(),
        }
    }

    pub fn create_conversation(&mut self) -> ConversationId {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.activate(id.clone());
        tracing::info!("Created conversation {}", id);
        id
    }

    pub fn select_conversation(&mut self, id: &ConversationId) -> Result<()> {
        if self.conversation(id).is_none() {
            return Err(StoreError::ConversationNotFound(id.clone()));
        }
        self.activate(id.clone());
        tracing::debug!("Selected conversation {}", id);
        Ok(())
    }

    /// Remove a conversation explicitly. If it was active, the next one
    /// becomes active (or a fresh one is created).
    pub fn delete_conversation(&mut self, id: &ConversationId) -> Result<()> {
        let pos = self
            .conversations
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| StoreError::ConversationNotFound(id.clone()))?;

        if self.active.as_ref() == Some(id) {
            self.playback.stop();
            self.upload = CurrentUpload::None;
            self.active = None;
        } else if let Some(playing) = self.playback.currently_playing_id() {
            if self.conversations[pos].find_media(playing).is_some() {
                self.playback.stop();
            }
        }

        self.conversations.remove(pos);
        if let (Some(persister), Some(session)) = (&self.persister, &self.session) {
            persister.delete_chat(id.as_str(), session.username.as_str());
        }
        tracing::info!("Deleted conversation {}", id);

        if self.active.is_none() {
            self.bootstrap();
        }
        Ok(())
    }

    /// Swap the active pointer; playback and pending upload never survive a switch
    fn activate(&mut self, id: ConversationId) {
        self.playback.stop();
        self.upload = CurrentUpload::None;
        self.active = Some(id);
    }

    // ---- messages ----

    fn next_message_id(&mut self) -> MessageId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last_message_id + 1);
        self.last_message_id = id;
        id
    }

    fn push_message(
        &mut self,
        conversation_id: &ConversationId,
        role: MessageRole,
        content: String,
        attachment: Option<Attachment>,
    ) -> Option<MessageId> {
        let id = self.next_message_id();
        let conversation = self.conversation_mut(conversation_id)?;
        let mut message = ChatMessage::new(id, role, content);
        if let Some(attachment) = attachment {
            message = message.with_attachment(attachment);
        }
        conversation.push_message(message);
        Some(id)
    }

    /// Append to the active conversation and schedule a save
    pub fn append_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        attachment: Option<Attachment>,
    ) -> Result<MessageId> {
        let active = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let id = self
            .push_message(&active, role, content.into(), attachment)
            .ok_or_else(|| StoreError::ConversationNotFound(active.clone()))?;
        self.persist_conversation(&active);
        Ok(id)
    }

    // ---- galleries ----

    fn allocate_media_id(&mut self) -> MediaId {
        self.next_media_id += 1;
        MediaId(self.next_media_id)
    }

    fn insert_media(&mut self, conversation_id: &ConversationId, file: MediaFile) -> Option<MediaId> {
        if self.conversation(conversation_id).is_none() {
            tracing::warn!(
                "Dropping media {} for unknown conversation {}",
                file.name,
                conversation_id
            );
            return None;
        }

        let kind = classify_file(&file);
        let id = self.allocate_media_id();
        let item = MediaItem::new(id, kind, file);
        tracing::info!("Added {} ({}, {} bytes) as {}", item.name, kind.as_str(), item.size, id);

        self.conversation_mut(conversation_id)?.gallery_mut(kind).push(item);
        Some(id)
    }

    /// Classify `file` and add it to the matching gallery of the given
    /// conversation. Returns `None` (and logs) when the conversation is not
    /// tracked, which is how stale async results end up.
    pub fn add_media_item(&mut self, conversation_id: &ConversationId, file: MediaFile) -> Option<MediaId> {
        let id = self.insert_media(conversation_id, file)?;
        self.persist_conversation(conversation_id);
        Some(id)
    }

    /// Remove an item from whichever gallery holds it. Playback of that item
    /// is stopped before the item goes away.
    pub fn remove_media_item(&mut self, id: MediaId) -> Option<MediaItem> {
        let conversation_id = match self.find_media(id) {
            Some((conversation_id, _)) => conversation_id.clone(),
            None => {
                tracing::debug!("remove_media_item: {} not found", id);
                return None;
            }
        };

        if self.playback.currently_playing_id() == Some(id) {
            self.playback.stop();
        }
        if self.upload.source() == Some(id) {
            self.upload = CurrentUpload::None;
        }

        let removed = self.conversation_mut(&conversation_id)?.remove_media(id);
        self.persist_conversation(&conversation_id);
        removed
    }

    // ---- playback ----

    /// Play an item of the active conversation, stopping anything else first.
    /// The item also becomes the single-file selection.
    pub fn set_playing(&mut self, id: MediaId) -> Result<()> {
        let item = self
            .active_conversation()
            .and_then(|c| c.find_media(id))
            .cloned()
            .ok_or(StoreError::MediaNotFound(id))?;

        self.playback.stop();
        let handle = self.handles.acquire(&item);
        self.playback.play(handle);
        self.upload = CurrentUpload::Single {
            file: item.file(),
            source: Some(id),
        };
        tracing::debug!("Playing {}", id);
        Ok(())
    }

    pub fn stop_playing(&mut self) {
        self.playback.stop();
    }

    /// Scoped handle for a download. The caller drops it when done.
    pub fn begin_download(&self, id: MediaId) -> Result<ObjectHandle> {
        let (_, item) = self.find_media(id).ok_or(StoreError::MediaNotFound(id))?;
        Ok(self.handles.acquire(item))
    }

    // ---- current upload ----

    pub fn select_file(&mut self, file: MediaFile) -> Result<()> {
        let active = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let name = file.name.clone();
        self.upload = CurrentUpload::Single { file, source: None };

        self.push_message(&active, MessageRole::Assistant, replies::file_uploaded(&name), None);
        self.push_message(&active, MessageRole::Assistant, replies::suggestions(&name), None);
        self.persist_conversation(&active);
        Ok(())
    }

    pub fn select_files(&mut self, files: Vec<MediaFile>) -> Result<()> {
        if files.is_empty() {
            return Err(StoreError::EmptySelection);
        }
        let active = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let content = replies::files_selected(&files);
        self.upload = CurrentUpload::Multiple(files);

        self.push_message(&active, MessageRole::Assistant, content, None);
        self.persist_conversation(&active);
        Ok(())
    }

    pub fn clear_upload(&mut self) {
        self.upload = CurrentUpload::None;
    }

    /// Make a gallery item the single-file selection
    pub fn preview_media_item(&mut self, id: MediaId) -> Result<()> {
        let active = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let item = self
            .conversation(&active)
            .and_then(|c| c.find_media(id))
            .ok_or(StoreError::MediaNotFound(id))?;
        let name = item.name.clone();
        self.upload = CurrentUpload::Single {
            file: item.file(),
            source: Some(id),
        };

        self.push_message(&active, MessageRole::Assistant, replies::previewing(&name), None);
        self.persist_conversation(&active);
        Ok(())
    }

    // ---- outgoing requests ----

    /// Snapshot for a processing call. `Ok(None)` means there is no file to
    /// process and the text should go out as a chat message instead.
    pub fn begin_processing(
        &self,
        instruction: impl Into<String>,
        origin: RequestOrigin,
    ) -> Result<Option<ProcessingRequest>> {
        let conversation_id = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let instruction = instruction.into();

        if origin == RequestOrigin::Merge {
            let files = self
                .upload
                .multiple()
                .filter(|files| files.len() >= 2)
                .ok_or(StoreError::NothingToMerge)?;
            return Ok(Some(ProcessingRequest {
                conversation_id,
                instruction,
                origin,
                files: files.to_vec(),
                source: None,
                order: None,
            }));
        }

        Ok(self.upload.single().map(|file| ProcessingRequest {
            conversation_id,
            instruction,
            origin,
            files: vec![file.clone()],
            source: self.upload.source(),
            order: None,
        }))
    }

    pub fn begin_chat(&self, text: impl Into<String>, origin: RequestOrigin) -> Result<ChatRequest> {
        let conversation_id = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        Ok(ChatRequest {
            conversation_id,
            text: text.into(),
            origin,
        })
    }

    // ---- incoming results ----

    /// Merge a processing result into the conversation that issued the
    /// request, whichever conversation is active now.
    pub fn ingest_processing_result(
        &mut self,
        request: &ProcessingRequest,
        result: anyhow::Result<ProcessOutcome>,
    ) -> IngestOutcome {
        let conversation_id = &request.conversation_id;
        if self.conversation(conversation_id).is_none() {
            tracing::warn!(
                "Dropping processing result for conversation {} that no longer exists",
                conversation_id
            );
            return IngestOutcome::Stale;
        }

        let (content, attachment, outcome) = match result {
            Err(e) => {
                tracing::warn!("Processing request failed: {:#}", e);
                (replies::transport_error(&request.origin), None, IngestOutcome::Failed)
            }
            Ok(ProcessOutcome::Failed { error }) => (
                replies::processing_failed(&request.origin, &error),
                None,
                IngestOutcome::Failed,
            ),
            Ok(ProcessOutcome::Empty { message }) => {
                tracing::warn!("Server returned no artifact: {}", message);
                (
                    replies::empty_result(&request.origin, &request.instruction),
                    None,
                    IngestOutcome::EmptyResult,
                )
            }
            Ok(ProcessOutcome::Processed { file, message }) => {
                let file_name = file.name.clone();
                let Some(media_id) = self.insert_media(conversation_id, file) else {
                    return IngestOutcome::Stale;
                };
                (
                    replies::processed(&request.origin, &request.instruction, &message),
                    Some(Attachment { media_id, file_name }),
                    IngestOutcome::MediaAdded(media_id),
                )
            }
        };

        self.push_message(conversation_id, MessageRole::Assistant, content, attachment);

        if request.mode() == RequestMode::Merge
            && matches!(outcome, IngestOutcome::MediaAdded(_))
            && self.active.as_ref() == Some(conversation_id)
            && self.upload.multiple().is_some()
        {
            self.upload = CurrentUpload::None;
        }

        self.persist_conversation(conversation_id);
        outcome
    }

    /// Route a plain chat reply by the captured conversation id
    pub fn ingest_chat_reply(&mut self, request: &ChatRequest, result: anyhow::Result<ChatOutcome>) -> IngestOutcome {
        let conversation_id = &request.conversation_id;
        if self.conversation(conversation_id).is_none() {
            tracing::warn!(
                "Dropping chat reply for conversation {} that no longer exists",
                conversation_id
            );
            return IngestOutcome::Stale;
        }

        let (content, outcome) = match result {
            Ok(ChatOutcome::Reply(reply)) => (reply, IngestOutcome::Replied),
            Ok(ChatOutcome::Acknowledged) => (replies::acknowledged(&request.origin), IngestOutcome::Replied),
            Ok(ChatOutcome::Failed(error)) => (replies::chat_failed(&request.origin, &error), IngestOutcome::Failed),
            Err(e) => {
                tracing::warn!("Chat request failed: {:#}", e);
                (replies::transport_error(&request.origin), IngestOutcome::Failed)
            }
        };

        self.push_message(conversation_id, MessageRole::Assistant, content, None);
        self.persist_conversation(conversation_id);
        outcome
    }

    // ---- session ----

    /// Install a logged-in user: remember the identity locally and replace
    /// local conversations with the stored ones.
    pub fn login(&mut self, session: UserSession, chats: Vec<ChatDocument>, library: Vec<LibraryItemDocument>) {
        if let Some(storage) = &self.session_storage {
            if let Err(e) = storage.save(&session) {
                tracing::warn!("Failed to save session: {}", e);
            }
        }
        tracing::info!("Logged in as {}", session.username);
        self.session = Some(session);
        self.library = library;
        self.load_conversations(chats);
    }

    /// Replace all conversations with stored ones. Media ids are reassigned
    /// so they stay unique within this session.
    pub fn load_conversations(&mut self, chats: Vec<ChatDocument>) {
        self.playback.stop();
        self.upload = CurrentUpload::None;
        self.active = None;

        let mut conversations: Vec<Conversation> = chats.into_iter().map(ChatDocument::into_conversation).collect();
        for conversation in &mut conversations {
            self.renumber_media(conversation);
            if let Some(max) = conversation.messages.iter().map(|m| m.id).max() {
                self.last_message_id = self.last_message_id.max(max);
            }
        }
        tracing::info!("Loaded {} conversations", conversations.len());

        self.conversations = conversations;
        self.bootstrap();
    }

    fn renumber_media(&mut self, conversation: &mut Conversation) {
        let mut remap = HashMap::new();
        for item in conversation
            .audio_files
            .iter_mut()
            .chain(conversation.video_files.iter_mut())
            .chain(conversation.other_files.iter_mut())
        {
            self.next_media_id += 1;
            let fresh = MediaId(self.next_media_id);
            remap.insert(item.id, fresh);
            item.id = fresh;
        }
        for message in &mut conversation.messages {
            if let Some(attachment) = message.attachment.as_mut() {
                if let Some(fresh) = remap.get(&attachment.media_id) {
                    attachment.media_id = *fresh;
                }
            }
        }
    }

    /// Read back the identity saved by the last login
    pub fn restore_session(&mut self) -> Option<UserSession> {
        let storage = self.session_storage.as_ref()?;
        match storage.load() {
            Ok(Some(session)) => {
                tracing::info!("Restored session for {}", session.username);
                self.session = Some(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to restore session: {}", e);
                None
            }
        }
    }

    /// Drop every conversation, selection and the session. Safe to call twice.
    pub fn logout(&mut self) {
        self.playback.stop();
        self.upload = CurrentUpload::None;
        self.conversations.clear();
        self.active = None;
        self.library.clear();

        if let Some(session) = self.session.take() {
            tracing::info!("Logged out {}", session.username);
        }
        if let Some(storage) = &self.session_storage {
            if let Err(e) = storage.clear() {
                tracing::warn!("Failed to clear session: {}", e);
            }
        }
    }

    // ---- library ----

    pub fn save_to_library(&mut self, id: MediaId) -> Result<()> {
        let session = self.session.as_ref().ok_or(StoreError::NotLoggedIn)?;
        let (_, item) = self.find_media(id).ok_or(StoreError::MediaNotFound(id))?;
        let doc = LibraryItemDocument::from_media_item(session.username.as_str(), item);

        if let Some(persister) = &self.persister {
            persister.save_library_item(doc.clone());
        }
        self.library.insert(0, doc);
        Ok(())
    }

    pub fn remove_from_library(&mut self, item_id: &str) -> Result<()> {
        let session = self.session.as_ref().ok_or(StoreError::NotLoggedIn)?;
        if let Some(persister) = &self.persister {
            persister.delete_library_item(item_id, session.username.as_str());
        }
        self.library.retain(|doc| doc.id.as_deref() != Some(item_id));
        Ok(())
    }

    /// Copy a library file into the active conversation under a new id
    pub fn import_library_item(&mut self, item_id: &str) -> Result<MediaId> {
        let active = self.active.clone().ok_or(StoreError::NoActiveConversation)?;
        let file = self
            .library
            .iter()
            .find(|doc| doc.id.as_deref() == Some(item_id))
            .ok_or_else(|| StoreError::LibraryItemNotFound(item_id.to_string()))?
            .to_media_file()?;

        self.add_media_item(&active, file)
            .ok_or_else(|| StoreError::ConversationNotFound(active.clone()))
    }

    // ---- persistence ----

    fn persist_conversation(&self, id: &ConversationId) {
        let (Some(persister), Some(session)) = (&self.persister, &self.session) else {
            return;
        };
        if let Some(conversation) = self.conversation(id) {
            persister.save_chat(ChatDocument::from_conversation(session.username.as_str(), conversation));
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
