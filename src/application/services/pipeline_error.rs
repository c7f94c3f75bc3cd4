use std::fmt;

use crate::application::ports::{
    ChatClientError, InvalidAudioError, StorageError, TranscodeError, TranscriptionError,
};
use crate::domain::SenderIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Gate,
    Download,
    Transcode,
    Probe,
    Upload,
    Transcribe,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Gate => "gate",
            PipelineStage::Download => "download",
            PipelineStage::Transcode => "transcode",
            PipelineStage::Probe => "probe",
            PipelineStage::Upload => "upload",
            PipelineStage::Transcribe => "transcribe",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("sender {sender} is not on the allow-list")]
    Unauthorized { sender: SenderIdentity },
    #[error("download: {0}")]
    Download(#[source] ChatClientError),
    #[error("transcode: {0}")]
    Transcode(#[source] TranscodeError),
    #[error("invalid audio: {0}")]
    InvalidAudio(#[source] InvalidAudioError),
    #[error("storage: {0}")]
    Storage(#[source] StorageError),
    #[error("transcription: {0}")]
    Transcription(#[source] TranscriptionError),
    #[error("run cancelled during {stage}")]
    Cancelled { stage: PipelineStage },
    #[error("run exceeded its deadline during {stage}")]
    TimedOut { stage: PipelineStage },
}

impl PipelineError {
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::Unauthorized { .. } => PipelineStage::Gate,
            PipelineError::Download(_) => PipelineStage::Download,
            PipelineError::Transcode(_) => PipelineStage::Transcode,
            PipelineError::InvalidAudio(_) => PipelineStage::Probe,
            PipelineError::Storage(_) => PipelineStage::Upload,
            PipelineError::Transcription(_) => PipelineStage::Transcribe,
            PipelineError::Cancelled { stage } | PipelineError::TimedOut { stage } => *stage,
        }
    }
}
