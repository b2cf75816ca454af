//! Fault-injecting wrapper around the local storage backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use fotovault_storage::{LocalStorage, Storage, StorageError, StorageResult};

/// Forwards to a real backend, with switches that make specific operations
/// fail or fire a cancellation at a precise point.
pub struct FaultyStorage {
    inner: LocalStorage,
    fail_deletes: AtomicBool,
    fail_namespace: AtomicBool,
    cancel_on_first_write: Mutex<Option<CancellationToken>>,
}

impl FaultyStorage {
    pub fn wrapping(inner: LocalStorage) -> Self {
        Self {
            inner,
            fail_deletes: AtomicBool::new(false),
            fail_namespace: AtomicBool::new(false),
            cancel_on_first_write: Mutex::new(None),
        }
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn fail_namespace(&self) {
        self.fail_namespace.store(true, Ordering::SeqCst);
    }

    /// Fire the token when the first write starts, then let it proceed.
    pub fn cancel_on_first_write(&self, token: CancellationToken) {
        *self.cancel_on_first_write.lock().unwrap() = Some(token);
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.inner.exists(key).await
    }

    async fn write(&self, key: &str, data: Bytes) -> StorageResult<()> {
        if let Some(token) = self.cancel_on_first_write.lock().unwrap().take() {
            token.cancel();
        }
        self.inner.write(key, data).await
    }

    async fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.inner.read(key).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::DeleteFailed(format!(
                "injected delete failure for {}",
                key
            )));
        }
        self.inner.delete(key).await
    }

    async fn ensure_namespace(&self, prefix: &str) -> StorageResult<()> {
        if self.fail_namespace.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed(format!(
                "injected namespace failure for {}",
                prefix
            )));
        }
        self.inner.ensure_namespace(prefix).await
    }
}
