//! Storage location model: backend-tagged reference to where an upload's bytes live.

use serde::{Deserialize, Serialize};

use crate::storage_types::StorageBackend;

/// Where a persisted file lives.
///
/// `key` is opaque and only meaningful to `backend`: a path relative to the
/// local storage root, or an object name inside the remote bucket. Reads must
/// always go through the backend recorded here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub backend: StorageBackend,
    pub key: String,
}

impl StorageLocation {
    pub fn new(backend: StorageBackend, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }
}
