use vibevideo_types::MediaId;

use crate::handles::ObjectHandle;

/// Process-wide record of the one item that is playing, if any.
///
/// The pointer owns the playback handle, so clearing or replacing it always
/// releases the previous handle.
#[derive(Debug, Default)]
pub struct PlaybackPointer {
    current: Option<ObjectHandle>,
}

impl PlaybackPointer {
    pub fn currently_playing_id(&self) -> Option<MediaId> {
        self.current.as_ref().map(ObjectHandle::media_id)
    }

    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Stop whatever is playing, then start `handle`
    pub(crate) fn play(&mut self, handle: ObjectHandle) {
        self.stop();
        self.current = Some(handle);
    }

    pub(crate) fn stop(&mut self) {
        if let Some(previous) = self.current.take() {
            tracing::debug!("Stopped playback of {}", previous.media_id());
        }
    }
}
