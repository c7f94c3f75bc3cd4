use async_trait::async_trait;

use crate::domain::{BlobHandle, NormalizedAudio, Transcript};

/// Speech recognition with an inline mode for short audio and a remote mode
/// for audio staged in object storage.
///
/// Both calls block until the backend has a final answer. A recognizer that
/// ran but heard nothing returns the placeholder transcript, not an error.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn recognize_inline(
        &self,
        audio: &NormalizedAudio,
    ) -> Result<Transcript, TranscriptionError>;

    async fn recognize_remote(&self, handle: &BlobHandle)
    -> Result<Transcript, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("recognition operation failed: {0}")]
    OperationFailed(String),
    #[error("recognition operation {operation} did not finish within {waited_secs}s")]
    OperationTimedOut { operation: String, waited_secs: u64 },
    #[error("no result for {0}")]
    MissingResult(String),
}
