//! Upload record persistence

use async_trait::async_trait;
use poet_core::models::UploadRecord;
use poet_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Where upload records live once their bytes are stored.
#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Insert a record. Only persisted records (with a storage location) are accepted.
    async fn insert(&self, record: UploadRecord) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError>;

    /// Remove a record, returning it if it existed.
    async fn delete(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError>;
}

/// Process-local repository; records are lost on restart.
#[derive(Clone, Default)]
pub struct InMemoryUploadRepository {
    records: Arc<RwLock<HashMap<Uuid, UploadRecord>>>,
}

impl InMemoryUploadRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UploadRepository for InMemoryUploadRepository {
    async fn insert(&self, record: UploadRecord) -> Result<(), AppError> {
        if !record.is_persisted() {
            return Err(AppError::Internal(format!(
                "Refusing to insert upload {} without a stored file",
                record.id
            )));
        }

        let mut records = self.records.write().await;
        if records.contains_key(&record.id) {
            return Err(AppError::Internal(format!(
                "Upload {} already exists",
                record.id
            )));
        }
        records.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        Ok(self.records.write().await.remove(&id))
    }
}
