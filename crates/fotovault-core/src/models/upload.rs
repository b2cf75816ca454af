use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::error::AppError;

/// One incoming file, as handed over by the transport layer.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Per-file result of an upload attempt.
///
/// `storage_key` is set once the bytes reached disk; `photo_id` once metadata
/// committed. The error is shared behind `Arc` so snapshots stay cheap.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub filename: String,
    pub photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
    pub size: i64,
    pub width: u32,
    pub height: u32,
    #[serde(serialize_with = "serialize_outcome_error")]
    pub error: Option<Arc<AppError>>,
}

fn serialize_outcome_error<S>(
    error: &Option<Arc<AppError>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl UploadOutcome {
    /// Outcome for a file whose bytes reached disk; metadata not yet written.
    pub fn staged(
        filename: impl Into<String>,
        storage_key: impl Into<String>,
        size: i64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            filename: filename.into(),
            photo_id: None,
            storage_key: Some(storage_key.into()),
            size,
            width,
            height,
            error: None,
        }
    }

    /// Outcome for a file that failed before anything durable happened.
    pub fn failed(filename: impl Into<String>, error: AppError) -> Self {
        Self {
            filename: filename.into(),
            photo_id: None,
            storage_key: None,
            size: 0,
            width: 0,
            height: 0,
            error: Some(Arc::new(error)),
        }
    }

    /// Attach a failure to an already-staged outcome.
    pub fn set_error(&mut self, error: AppError) {
        self.error = Some(Arc::new(error));
    }

    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Default)]
struct ReportInner {
    outcomes: Vec<UploadOutcome>,
    err_count: usize,
}

/// Concurrency-safe collector of per-file upload outcomes.
///
/// One report is owned by one batch request; producers append through a
/// shared reference while the collector and caller read counters. Reads hand
/// out copies, never references into the guarded state.
#[derive(Debug, Default)]
pub struct UploadReport {
    inner: RwLock<ReportInner>,
}

impl UploadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, outcome: UploadOutcome) {
        let mut inner = self.inner.write().await;
        if outcome.is_err() {
            inner.err_count += 1;
        }
        inner.outcomes.push(outcome);
    }

    /// Snapshot of all outcomes recorded so far.
    pub async fn outcomes(&self) -> Vec<UploadOutcome> {
        self.inner.read().await.outcomes.clone()
    }

    pub async fn total(&self) -> usize {
        self.inner.read().await.outcomes.len()
    }

    pub async fn success_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.outcomes.len() - inner.err_count
    }

    pub async fn error_count(&self) -> usize {
        self.inner.read().await.err_count
    }

    /// True when at least one file was attempted and every attempt failed.
    pub async fn is_all_failed(&self) -> bool {
        let inner = self.inner.read().await;
        !inner.outcomes.is_empty() && inner.err_count == inner.outcomes.len()
    }

    /// True when some, but not all, attempts failed.
    pub async fn has_partial_failure(&self) -> bool {
        let inner = self.inner.read().await;
        inner.err_count > 0 && inner.err_count < inner.outcomes.len()
    }

    /// Batch-level classification once all outcomes are in: every file failed,
    /// some files failed, or no error at all (including the empty batch).
    pub async fn aggregate_error(&self) -> Option<AppError> {
        let inner = self.inner.read().await;
        let total = inner.outcomes.len();
        if total == 0 || inner.err_count == 0 {
            None
        } else if inner.err_count == total {
            Some(AppError::AllFailed { total })
        } else {
            Some(AppError::PartialSuccess {
                total,
                failed: inner.err_count,
            })
        }
    }
}
