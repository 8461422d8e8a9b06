//! Poet Storage Library
//!
//! Storage abstraction for uploaded files: the `Storage` trait, its local
//! filesystem and S3 implementations, and the `UploadStorageManager` that
//! turns uploads into persisted records and back.
//!
//! # Storage key format
//!
//! Every object is stored under `{uuid}_{filename}`, so uploads that share a
//! display name never collide. Keys must not contain `..` segments or a
//! leading `/`. Key generation lives in the `keys` module so both backends
//! stay consistent.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod manager;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_manager, create_storage};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use manager::{UploadError, UploadStorageManager};
pub use poet_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::{object_url, S3Storage};
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
