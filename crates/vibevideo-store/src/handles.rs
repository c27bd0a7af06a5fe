//! Scoped payload handles.
//!
//! A handle stands in for a browser object URL: it is created when an item
//! becomes the playback target or is queued for download, and released when
//! the guard is dropped. The registry only tracks which handles are alive.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use vibevideo_types::{MediaFile, MediaId, MediaItem};

#[derive(Debug, Default)]
struct Registry {
    next_id: AtomicU64,
    live: Mutex<HashMap<u64, MediaId>>,
}

impl Registry {
    fn live(&self) -> MutexGuard<'_, HashMap<u64, MediaId>> {
        // Poisoning is ignored: the map only sees single insert/remove calls
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<Registry>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self, item: &MediaItem) -> ObjectHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.live().insert(id, item.id);
        tracing::debug!("Acquired handle {} for {}", id, item.id);
        ObjectHandle {
            id,
            media_id: item.id,
            file: item.file(),
            registry: Arc::clone(&self.inner),
        }
    }

    pub fn live_count(&self) -> usize {
        self.inner.live().len()
    }

    /// Number of live handles pointing at one item
    pub fn live_for(&self, media_id: MediaId) -> usize {
        self.inner.live().values().filter(|id| **id == media_id).count()
    }
}

/// Guard over one live handle. Dropping it releases the handle.
#[derive(Debug)]
pub struct ObjectHandle {
    id: u64,
    media_id: MediaId,
    file: MediaFile,
    registry: Arc<Registry>,
}

impl ObjectHandle {
    pub fn media_id(&self) -> MediaId {
        self.media_id
    }

    pub fn url(&self) -> String {
        format!("blob:vibevideo/{}", self.id)
    }

    pub fn file(&self) -> &MediaFile {
        &self.file
    }
}

impl Drop for ObjectHandle {
    fn drop(&mut self) {
        self.registry.live().remove(&self.id);
        tracing::debug!("Released handle {} for {}", self.id, self.media_id);
    }
}
