mod audio_transcoder;
mod blob_store;
mod chat_client;
mod duration_prober;
mod transcription_service;

pub use audio_transcoder::{AudioTranscoder, TranscodeError};
pub use blob_store::{StorageError, TransientBlobStore};
pub use chat_client::{ChatClient, ChatClientError};
pub use duration_prober::{DurationProber, InvalidAudioError};
pub use transcription_service::{TranscriptionError, TranscriptionService};
