use async_trait::async_trait;

use crate::domain::{AudioFileRef, ChatId, InboundEvent};

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Long-polls for events with `update_id >= offset`.
    async fn poll_events(&self, offset: i64) -> Result<Vec<InboundEvent>, ChatClientError>;

    async fn download_audio(&self, file: &AudioFileRef) -> Result<Vec<u8>, ChatClientError>;

    async fn send_message(&self, chat_id: ChatId, text: &str) -> Result<(), ChatClientError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("client configuration: {0}")]
    Configuration(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("platform rejected request: {0}")]
    Api(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("file has no download path: {0}")]
    MissingFilePath(String),
}
