#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use vibevideo_media::{ChatOutcome, MediaProcessingClient, ProcessOutcome};
use vibevideo_persist::{ChatDocument, LibraryItemDocument, LoginResult, PersistError, PersistenceClient, UserAccount};
use vibevideo_types::MediaFile;

pub fn video(name: &str) -> MediaFile {
    MediaFile::new(name, "video/mp4", b"video-bytes".to_vec())
}

pub fn audio(name: &str) -> MediaFile {
    MediaFile::new(name, "audio/mpeg", b"audio-bytes".to_vec())
}

pub fn processed(file: MediaFile) -> ProcessOutcome {
    ProcessOutcome::Processed {
        file,
        message: "File processed successfully!".to_string(),
    }
}

/// Media client that replays queued outcomes and records calls
#[derive(Default)]
pub struct ScriptedMediaClient {
    process: Mutex<VecDeque<anyhow::Result<ProcessOutcome>>>,
    chat: Mutex<VecDeque<ChatOutcome>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedMediaClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call waits for `gate.notify_one()` before answering
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_process(&self, outcome: anyhow::Result<ProcessOutcome>) {
        self.process.lock().unwrap().push_back(outcome);
    }

    pub fn push_chat(&self, outcome: ChatOutcome) {
        self.chat.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }

    fn next_process(&self) -> anyhow::Result<ProcessOutcome> {
        self.process
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ProcessOutcome::Empty { message: "nothing queued".to_string() }))
    }
}

#[async_trait]
impl MediaProcessingClient for ScriptedMediaClient {
    async fn send_message(&self, text: &str) -> anyhow::Result<ChatOutcome> {
        self.calls.lock().unwrap().push(format!("chat:{}", text));
        self.wait().await;
        Ok(self
            .chat
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| ChatOutcome::Reply("ok".to_string())))
    }

    async fn process_file(&self, file: &MediaFile, instruction: &str) -> anyhow::Result<ProcessOutcome> {
        self.calls.lock().unwrap().push(format!("process:{}:{}", file.name, instruction));
        self.wait().await;
        self.next_process()
    }

    async fn process_multiple_files(
        &self,
        files: &[MediaFile],
        command: &str,
        order: Option<&str>,
    ) -> anyhow::Result<ProcessOutcome> {
        self.calls.lock().unwrap().push(format!(
            "merge:{}:{}:{}",
            files.len(),
            command,
            order.unwrap_or("-")
        ));
        self.wait().await;
        self.next_process()
    }

    async fn check_health(&self) -> bool {
        true
    }
}

/// In-memory persistence backend that records writes
#[derive(Default)]
pub struct RecordingPersistence {
    pub saved_chats: Mutex<Vec<ChatDocument>>,
    pub deleted_chats: Mutex<Vec<String>>,
    pub library_saves: Mutex<Vec<LibraryItemDocument>>,
    pub stored_chats: Mutex<Vec<ChatDocument>>,
    pub fail_writes: bool,
}

impl RecordingPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_chats(chats: Vec<ChatDocument>) -> Self {
        Self {
            stored_chats: Mutex::new(chats),
            ..Self::default()
        }
    }

    fn write_result(&self) -> vibevideo_persist::error::Result<()> {
        if self.fail_writes {
            Err(PersistError::Connection("database offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PersistenceClient for RecordingPersistence {
    async fn login(&self, username: &str, password: &str) -> vibevideo_persist::error::Result<LoginResult> {
        if password != "secret" {
            return Err(PersistError::InvalidCredentials);
        }
        Ok(LoginResult {
            user: UserAccount {
                id: Some("u-1".to_string()),
                username: username.to_string(),
                email: Some(format!("{}@example.com", username)),
            },
            chats: self.stored_chats.lock().unwrap().clone(),
            library_items: Vec::new(),
        })
    }

    async fn register(&self, username: &str, email: &str, _password: &str) -> vibevideo_persist::error::Result<UserAccount> {
        Ok(UserAccount {
            id: Some("u-2".to_string()),
            username: username.to_string(),
            email: Some(email.to_string()),
        })
    }

    async fn list_chats(&self, _username: &str, _limit: Option<i64>) -> vibevideo_persist::error::Result<Vec<ChatDocument>> {
        Ok(self.stored_chats.lock().unwrap().clone())
    }

    async fn upsert_chat(&self, chat: &ChatDocument) -> vibevideo_persist::error::Result<()> {
        self.write_result()?;
        self.saved_chats.lock().unwrap().push(chat.clone());
        Ok(())
    }

    async fn delete_chat(&self, chat_id: &str, _username: &str) -> vibevideo_persist::error::Result<()> {
        self.write_result()?;
        self.deleted_chats.lock().unwrap().push(chat_id.to_string());
        Ok(())
    }

    async fn list_library(&self, _username: &str, _limit: Option<i64>) -> vibevideo_persist::error::Result<Vec<LibraryItemDocument>> {
        Ok(Vec::new())
    }

    async fn save_library_item(&self, item: &LibraryItemDocument) -> vibevideo_persist::error::Result<String> {
        self.write_result()?;
        self.library_saves.lock().unwrap().push(item.clone());
        Ok(item.id.clone().unwrap_or_default())
    }

    async fn delete_library_item(&self, _item_id: &str, _username: &str) -> vibevideo_persist::error::Result<()> {
        self.write_result()
    }
}
