/// Preset edit requests offered next to the message input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuickAction {
    Transcript,
    SpeedUp,
    CutVideo,
    Grayscale,
    EnhanceAudio,
    Merge,
}

impl QuickAction {
    pub const ALL: [QuickAction; 6] = [
        QuickAction::Transcript,
        QuickAction::SpeedUp,
        QuickAction::CutVideo,
        QuickAction::Grayscale,
        QuickAction::EnhanceAudio,
        QuickAction::Merge,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuickAction::Transcript => "transcript",
            QuickAction::SpeedUp => "speed-up",
            QuickAction::CutVideo => "cut-video",
            QuickAction::Grayscale => "grayscale",
            QuickAction::EnhanceAudio => "enhance-audio",
            QuickAction::Merge => "merge",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    /// Text sent to the processing API (and shown as the user's message)
    pub fn instruction(&self) -> &'static str {
        match self {
            QuickAction::Transcript => "transcript",
            QuickAction::SpeedUp => "Speed up video by 2x",
            QuickAction::CutVideo => "Cut video from 0:30 to 2:15",
            QuickAction::Grayscale => "Convert to grayscale",
            QuickAction::EnhanceAudio => "Remove background noise",
            QuickAction::Merge => "Merge files",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for action in QuickAction::ALL {
            assert_eq!(QuickAction::from_id(action.id()), Some(action));
        }
        assert_eq!(QuickAction::from_id("sepia"), None);
    }

    #[test]
    fn test_instruction_texts() {
        assert_eq!(QuickAction::SpeedUp.instruction(), "Speed up video by 2x");
        assert_eq!(QuickAction::EnhanceAudio.instruction(), "Remove background noise");
    }
}
