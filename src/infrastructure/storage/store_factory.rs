use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{StorageError, TransientBlobStore};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::object_blob_store::ObjectBlobStore;

pub struct BlobStoreFactory;

impl BlobStoreFactory {
    pub fn create(
        settings: &StorageSettings,
        credentials_file: &Path,
    ) -> Result<Arc<dyn TransientBlobStore>, StorageError> {
        match settings.provider {
            StorageProviderSetting::Gcs => {
                let bucket = settings
                    .bucket
                    .as_deref()
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| StorageError::Configuration("bucket required".into()))?;
                tracing::info!(bucket, "Using Google Cloud Storage for long recordings");
                Ok(Arc::new(ObjectBlobStore::gcs(bucket, credentials_file)?))
            }
            StorageProviderSetting::Local => {
                let path = settings
                    .local_path
                    .as_deref()
                    .ok_or_else(|| StorageError::Configuration("local_path required".into()))?;
                tracing::info!(
                    path = %path.display(),
                    "Using local filesystem for long recordings"
                );
                Ok(Arc::new(ObjectBlobStore::local(path)?))
            }
        }
    }
}
