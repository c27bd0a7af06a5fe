use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Storage key of the logged-in identity
pub const SESSION_KEY: &str = "currentUser";

/// Identity of the logged-in user, kept across restarts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub logged_in_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            logged_in_at: Utc::now(),
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<UserSession>>;
    fn save(&self, session: &UserSession) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Session file `<dir>/currentUser.json`, written via a temp file and rename
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.vibevideo`
    pub fn in_home() -> Self {
        Self::new(home_dir().join(".vibevideo"))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{SESSION_KEY}.json"))
    }

    fn read(path: &Path) -> io::Result<UserSession> {
        let data = fs::read(path)?;
        serde_json::from_slice(&data).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}

fn session_error(path: &Path, err: io::Error) -> StoreError {
    StoreError::Session(format!("{}: {err}", path.display()))
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<UserSession>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some).map_err(|err| session_error(&path, err))
    }

    fn save(&self, session: &UserSession) -> Result<()> {
        let final_path = self.path();
        let tmp_path = self.dir.join(format!("{SESSION_KEY}.json.tmp"));

        fs::create_dir_all(&self.dir).map_err(|err| session_error(&self.dir, err))?;
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|err| StoreError::Session(err.to_string()))?;
        fs::write(&tmp_path, bytes).map_err(|err| session_error(&tmp_path, err))?;

        match fs::rename(&tmp_path, &final_path) {
            Ok(()) => Ok(()),
            Err(rename_err) => {
                if final_path.exists() {
                    fs::remove_file(&final_path).map_err(|err| session_error(&final_path, err))?;
                    fs::rename(&tmp_path, &final_path).map_err(|err| session_error(&final_path, err))
                } else {
                    Err(session_error(&final_path, rename_err))
                }
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(session_error(&path, err)),
        }
    }
}

/// In-process storage, used when no session directory should be touched
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<UserSession>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<UserSession>> {
        Ok(self.slot.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, session: &UserSession) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("vibevideo-session-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_file_session_save_load_clear() {
        let dir = temp_dir();
        let storage = FileSessionStorage::new(&dir);

        assert_eq!(storage.load().unwrap(), None);

        let session = UserSession::new("frank").with_email(Some("f@x.io".to_string()));
        storage.save(&session).unwrap();
        assert!(storage.path().ends_with("currentUser.json"));
        assert_eq!(storage.load().unwrap(), Some(session));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // Clearing twice is fine
        storage.clear().unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("currentUser.json"), b"{ not json").unwrap();

        let storage = FileSessionStorage::new(&dir);
        assert!(matches!(storage.load(), Err(StoreError::Session(_))));

        let _ = fs::remove_dir_all(dir);
    }
}
