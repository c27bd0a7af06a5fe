use vibevideo_types::{MediaFile, MediaId};

/// Pending file selection for the next outgoing message. Single and
/// multiple selections exclude each other.
#[derive(Debug, Clone, Default)]
pub enum CurrentUpload {
    #[default]
    None,
    Single {
        file: MediaFile,
        /// Gallery item the selection came from, if any
        source: Option<MediaId>,
    },
    Multiple(Vec<MediaFile>),
}

impl CurrentUpload {
    pub fn is_empty(&self) -> bool {
        matches!(self, CurrentUpload::None)
    }

    pub fn single(&self) -> Option<&MediaFile> {
        match self {
            CurrentUpload::Single { file, .. } => Some(file),
            _ => None,
        }
    }

    pub fn multiple(&self) -> Option<&[MediaFile]> {
        match self {
            CurrentUpload::Multiple(files) => Some(files),
            _ => None,
        }
    }

    pub(crate) fn source(&self) -> Option<MediaId> {
        match self {
            CurrentUpload::Single { source, .. } => *source,
            _ => None,
        }
    }
}
