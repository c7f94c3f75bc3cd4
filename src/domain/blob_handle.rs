use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reference to an object staged in the transient blob store.
///
/// `key` addresses the object inside its bucket and is what deletion uses;
/// `uri` is the fully qualified location handed to the recognizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobHandle {
    key: String,
    uri: String,
}

impl BlobHandle {
    pub fn new(key: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            uri: uri.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for BlobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// Object key for a staged recording: `rec-<timestamp>-<uuid>.wav`.
pub fn recording_object_key(now: DateTime<Utc>) -> String {
    format!(
        "rec-{}-{}.wav",
        now.format("%Y%m%d-%H%M%S%.3fZ"),
        Uuid::new_v4()
    )
}
