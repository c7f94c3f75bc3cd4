use std::io;

use async_trait::async_trait;

/// Converts arbitrary input audio into canonical WAV (mono, 16 kHz, s16le).
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    async fn normalize(&self, raw: &[u8]) -> Result<Vec<u8>, TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("scratch file: {0}")]
    Scratch(#[source] io::Error),
    #[error("failed to launch transcoder: {0}")]
    Launch(#[source] io::Error),
    #[error("transcoder exited with status {code:?}: {stderr}")]
    Exit { code: Option<i32>, stderr: String },
    #[error("failed to read transcoded output: {0}")]
    ReadBack(#[source] io::Error),
    #[error("transcoder produced no output")]
    EmptyOutput,
}
