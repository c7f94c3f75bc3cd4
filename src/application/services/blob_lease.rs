use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use crate::application::ports::{StorageError, TransientBlobStore};
use crate::domain::BlobHandle;

const CLEANUP_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns a staged blob for the lifetime of one pipeline run.
///
/// `release` deletes the blob and is the normal exit. A lease dropped while
/// still armed (cancelled run, panic) schedules the delete on the current
/// runtime instead.
pub struct BlobLease {
    store: Arc<dyn TransientBlobStore>,
    handle: BlobHandle,
    armed: bool,
}

impl BlobLease {
    pub async fn acquire(
        store: Arc<dyn TransientBlobStore>,
        data: Bytes,
    ) -> Result<Self, StorageError> {
        let size = data.len();
        let handle = store.put(data).await?;
        tracing::debug!(blob = %handle, bytes = size, "Transient blob staged");
        Ok(Self {
            store,
            handle,
            armed: true,
        })
    }

    pub fn handle(&self) -> &BlobHandle {
        &self.handle
    }

    /// Deletes the blob. Failures are logged and never propagated.
    pub async fn release(mut self) {
        self.armed = false;
        delete_logged(self.store.as_ref(), &self.handle).await;
    }
}

impl Drop for BlobLease {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let store = Arc::clone(&self.store);
        let handle = self.handle.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!(
                    blob = %handle,
                    "Blob lease dropped while armed, scheduling delete"
                );
                runtime.spawn(async move {
                    delete_logged(store.as_ref(), &handle).await;
                });
            }
            Err(_) => {
                tracing::error!(blob = %handle, "No runtime available to delete abandoned blob");
            }
        }
    }
}

async fn delete_logged(store: &dyn TransientBlobStore, handle: &BlobHandle) {
    match tokio::time::timeout(CLEANUP_TIMEOUT, store.delete(handle)).await {
        Ok(Ok(())) => tracing::debug!(blob = %handle, "Transient blob deleted"),
        Ok(Err(StorageError::NotFound(_))) => {
            tracing::warn!(blob = %handle, "Transient blob was already deleted");
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, blob = %handle, "Failed to delete transient blob");
        }
        Err(_) => {
            tracing::warn!(
                blob = %handle,
                timeout_secs = CLEANUP_TIMEOUT.as_secs(),
                "Timed out deleting transient blob"
            );
        }
    }
}
