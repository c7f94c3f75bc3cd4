mod google_auth;
mod google_speech_service;

pub use google_auth::{GoogleCredentials, ServiceAccountAuth, ServiceAccountKey};
pub use google_speech_service::{
    DEFAULT_SPEECH_BASE_URL, GoogleSpeechConfig, GoogleSpeechService, PollingConfig,
    batch_recognize_request, recognize_request, recognizer_path,
};
