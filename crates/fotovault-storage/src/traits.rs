//! Storage abstraction trait
//!
//! This module defines the `Storage` trait that all storage backends must
//! implement, together with the error type shared by them.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Backends must be safe for concurrent calls on distinct keys. `delete` is
/// idempotent: removing a key that does not exist is Ok. `read` returns the
/// complete object or fails; partial reads are never returned.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Whether an object exists under the given key
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Write the full object under the given key, creating the namespace
    /// path as needed
    async fn write(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Read the full object
    async fn read(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Remove the object. Missing objects are not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Ensure the given key prefix exists as a writable namespace
    async fn ensure_namespace(&self, prefix: &str) -> StorageResult<()>;
}
