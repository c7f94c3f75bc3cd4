use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::BlobHandle;

/// Object storage used to stage long recordings for the remote recognizer.
#[async_trait]
pub trait TransientBlobStore: Send + Sync {
    async fn put(&self, data: Bytes) -> Result<BlobHandle, StorageError>;

    async fn delete(&self, handle: &BlobHandle) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage configuration: {0}")]
    Configuration(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}
