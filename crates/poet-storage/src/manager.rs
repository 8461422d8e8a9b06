//! Upload storage manager
//!
//! Turns a display filename plus bytes into a persisted `UploadRecord`, and a
//! persisted record back into a byte stream or a public link.
//!
//! Each record carries the backend that wrote it (`StorageLocation::backend`)
//! and every read dispatches on that, not on the currently configured write
//! backend. Records written before a backend switch stay readable as long as
//! the old backend is still registered with the manager.

use crate::traits::{ByteStream, Storage, StorageError};
use crate::{keys, StorageBackend};
use bytes::Bytes;
use poet_core::models::{StorageLocation, UploadRecord};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the upload storage manager
#[derive(Debug, Error)]
pub enum UploadError {
    /// Rejected before any I/O (empty filename, empty content).
    #[error("Bad input: {0}")]
    BadInput(String),

    /// The record already has stored bytes. This is a caller bug, not a runtime condition.
    #[error("Upload {id} is already stored; refusing to overwrite it")]
    OverwriteAttempt { id: Uuid },

    /// Retrieval was asked for a record that was never stored.
    #[error("Upload {id} has no stored file")]
    NotPersisted { id: Uuid },

    /// The backing object is gone (deleted out of band or never written).
    #[error("Stored file not found: {0}")]
    NotFound(String),

    #[error("Storage backend '{0}' is not configured in this process")]
    BackendNotConfigured(StorageBackend),

    #[error("Storage backend '{0}' does not serve public links")]
    LinkUnsupported(StorageBackend),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        if err.is_not_found() {
            UploadError::NotFound(err.to_string())
        } else {
            UploadError::Storage(err)
        }
    }
}

/// Persists uploads to the configured backend and reads them back from
/// whichever backend wrote them.
#[derive(Clone)]
pub struct UploadStorageManager {
    primary: StorageBackend,
    backends: HashMap<StorageBackend, Arc<dyn Storage>>,
}

impl UploadStorageManager {
    /// New uploads are written to `primary`.
    pub fn new(primary: Arc<dyn Storage>) -> Self {
        let kind = primary.backend_type();
        let mut backends = HashMap::new();
        backends.insert(kind, primary);
        Self {
            primary: kind,
            backends,
        }
    }

    /// Register an additional read backend. The write backend is never replaced.
    pub fn with_backend(mut self, backend: Arc<dyn Storage>) -> Self {
        let kind = backend.backend_type();
        if kind != self.primary {
            self.backends.insert(kind, backend);
        }
        self
    }

    /// Backend new uploads are written to.
    pub fn primary_backend(&self) -> StorageBackend {
        self.primary
    }

    pub fn backend(&self, kind: StorageBackend) -> Option<&Arc<dyn Storage>> {
        self.backends.get(&kind)
    }

    fn backend_for(&self, kind: StorageBackend) -> Result<&Arc<dyn Storage>, UploadError> {
        self.backend(kind)
            .ok_or(UploadError::BackendNotConfigured(kind))
    }

    fn persisted_location(record: &UploadRecord) -> Result<&StorageLocation, UploadError> {
        match &record.location {
            Some(location) if !location.key.is_empty() => Ok(location),
            _ => Err(UploadError::NotPersisted { id: record.id }),
        }
    }

    /// Create a record for `filename` and store `data` for it.
    ///
    /// Either the returned record is fully written with a location set, or an
    /// error is returned and no record escapes.
    pub async fn store(
        &self,
        filename: &str,
        data: Bytes,
        owner: Option<Uuid>,
    ) -> Result<UploadRecord, UploadError> {
        if filename.trim().is_empty() {
            return Err(UploadError::BadInput("filename must not be empty".to_string()));
        }

        let mut record = UploadRecord::new(filename, owner);
        self.save_file(&mut record, data).await?;
        Ok(record)
    }

    /// Write `data` for a record that has not been stored yet and set its location.
    ///
    /// Fails with `OverwriteAttempt` if the record already has stored bytes;
    /// the existing object is left untouched.
    pub async fn save_file(&self, record: &mut UploadRecord, data: Bytes) -> Result<(), UploadError> {
        if record.is_persisted() {
            return Err(UploadError::OverwriteAttempt { id: record.id });
        }
        if record.filename.trim().is_empty() {
            return Err(UploadError::BadInput("filename must not be empty".to_string()));
        }
        if data.is_empty() {
            return Err(UploadError::BadInput("file content must not be empty".to_string()));
        }

        let backend = self.backend_for(self.primary)?;
        let key = keys::generate_storage_key(&record.filename);

        backend.put(&key, data).await.map_err(UploadError::Storage)?;

        tracing::debug!(
            upload_id = %record.id,
            backend = %self.primary,
            key = %key,
            "Upload stored"
        );

        record.location = Some(StorageLocation::new(self.primary, key));
        Ok(())
    }

    /// Open the stored file of `record` as a stream positioned at its start.
    pub async fn retrieve(&self, record: &UploadRecord) -> Result<ByteStream, UploadError> {
        let location = Self::persisted_location(record)?;
        let backend = self.backend_for(location.backend)?;
        Ok(backend.get_stream(&location.key).await?)
    }

    /// Deterministic public link to the stored file.
    ///
    /// Only remote records have one, and the link only resolves if the bucket
    /// is configured for public read; nothing is signed and nothing expires.
    pub fn link_for(&self, record: &UploadRecord) -> Result<String, UploadError> {
        let location = Self::persisted_location(record)?;
        let backend = self.backend_for(location.backend)?;
        backend
            .public_url(&location.key)
            .ok_or(UploadError::LinkUnsupported(location.backend))
    }

    /// Remove the stored file of `record` from the backend that wrote it.
    pub async fn delete(&self, record: &UploadRecord) -> Result<(), UploadError> {
        let location = Self::persisted_location(record)?;
        let backend = self.backend_for(location.backend)?;
        backend
            .delete(&location.key)
            .await
            .map_err(UploadError::Storage)
    }
}
