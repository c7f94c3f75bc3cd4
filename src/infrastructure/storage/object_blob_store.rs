use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{StorageError, TransientBlobStore};
use crate::domain::{BlobHandle, recording_object_key};

/// Transient blob store over any `object_store` backend.
///
/// Each put writes a fresh `rec-<timestamp>-<uuid>.wav` object; the handle
/// carries both that key and the URI the recognizer reads from.
pub struct ObjectBlobStore {
    inner: Arc<dyn ObjectStore>,
    uri_prefix: String,
}

impl ObjectBlobStore {
    pub fn gcs(bucket: &str, service_account_path: &Path) -> Result<Self, StorageError> {
        let store = GoogleCloudStorageBuilder::new()
            .with_bucket_name(bucket)
            .with_service_account_path(service_account_path.to_string_lossy())
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
            uri_prefix: format!("gs://{bucket}"),
        })
    }

    pub fn local(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        let base_path = base_path
            .canonicalize()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(fs),
            uri_prefix: format!("file://{}", base_path.display()),
        })
    }

    fn handle_for(&self, key: String) -> BlobHandle {
        let uri = format!("{}/{}", self.uri_prefix.trim_end_matches('/'), key);
        BlobHandle::new(key, uri)
    }
}

#[async_trait::async_trait]
impl TransientBlobStore for ObjectBlobStore {
    async fn put(&self, data: Bytes) -> Result<BlobHandle, StorageError> {
        let key = recording_object_key(chrono::Utc::now());
        let size = data.len();
        let store_path = StorePath::from(key.as_str());

        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let handle = self.handle_for(key);
        tracing::debug!(blob = %handle, bytes = size, "Blob stored");
        Ok(handle)
    }

    async fn delete(&self, handle: &BlobHandle) -> Result<(), StorageError> {
        let store_path = StorePath::from(handle.key());
        match self.inner.delete(&store_path).await {
            Ok(()) => {
                tracing::debug!(blob = %handle, "Blob deleted");
                Ok(())
            }
            Err(object_store::Error::NotFound { path, .. }) => Err(StorageError::NotFound(path)),
            Err(e) => Err(StorageError::DeleteFailed(e.to_string())),
        }
    }
}
