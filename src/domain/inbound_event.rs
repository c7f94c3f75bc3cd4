use super::{ChatId, SenderIdentity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    Voice,
    Audio,
}

impl AudioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioKind::Voice => "voice",
            AudioKind::Audio => "audio",
        }
    }
}

/// Platform reference to an audio attachment that still has to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileRef {
    pub file_id: String,
    pub kind: AudioKind,
}

impl AudioFileRef {
    pub fn new(file_id: impl Into<String>, kind: AudioKind) -> Self {
        Self {
            file_id: file_id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceMessage {
    pub chat_id: ChatId,
    pub sender: SenderIdentity,
    pub file: AudioFileRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEventKind {
    Voice(VoiceMessage),
    Other,
}

/// One update from the chat platform, in feed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub update_id: i64,
    pub kind: InboundEventKind,
}

impl InboundEvent {
    pub fn voice(update_id: i64, message: VoiceMessage) -> Self {
        Self {
            update_id,
            kind: InboundEventKind::Voice(message),
        }
    }

    pub fn other(update_id: i64) -> Self {
        Self {
            update_id,
            kind: InboundEventKind::Other,
        }
    }
}
