#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult, UploadStorageManager};
use poet_core::StorageConfig;
use std::sync::Arc;

/// Build a single storage backend of kind `backend` from configuration
pub async fn create_storage(
    config: &StorageConfig,
    backend: StorageBackend,
) -> StorageResult<Arc<dyn Storage>> {
    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .remote_bucket
                .clone()
                .ok_or_else(|| StorageError::Config("S3_UPLOADS_BUCKET not configured".to_string()))?;

            let storage = S3Storage::new(
                bucket,
                config.remote_region.clone(),
                config.remote_endpoint.clone(),
                config.remote_host.clone(),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::Config(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let root = config
                .local_root
                .clone()
                .ok_or_else(|| StorageError::Config("UPLOADS_DIR not configured".to_string()))?;

            let storage = LocalStorage::new(root).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::Config(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

fn is_configured(config: &StorageConfig, backend: StorageBackend) -> bool {
    match backend {
        StorageBackend::Local => config.local_root.is_some(),
        StorageBackend::S3 => config.remote_bucket.is_some(),
    }
}

/// Create the upload storage manager for this process.
///
/// The backend named by `config.mode` receives all new uploads and must build
/// successfully. Any other backend with settings present is registered for
/// reads only; if it fails to build it is skipped with a warning.
pub async fn create_manager(config: &StorageConfig) -> StorageResult<UploadStorageManager> {
    let primary = create_storage(config, config.mode).await?;
    let mut manager = UploadStorageManager::new(primary);

    for backend in [StorageBackend::Local, StorageBackend::S3] {
        if backend == config.mode || !is_configured(config, backend) {
            continue;
        }
        match create_storage(config, backend).await {
            Ok(storage) => {
                tracing::info!(backend = %backend, "Registered read-only storage backend");
                manager = manager.with_backend(storage);
            }
            Err(e) => {
                tracing::warn!(
                    backend = %backend,
                    error = %e,
                    "Secondary storage backend unavailable; its uploads cannot be read"
                );
            }
        }
    }

    tracing::info!(backend = %config.mode, "Upload storage ready");
    Ok(manager)
}

/// Create a manager for testing (local storage in a temp directory)
#[cfg(all(test, feature = "storage-local"))]
pub async fn create_test_manager(root: &std::path::Path) -> StorageResult<UploadStorageManager> {
    create_manager(&StorageConfig::local(root)).await
}
