//! Batch ingestion pipeline.
//!
//! Two bounded stages connected by queues: a disk pool writes bytes and
//! decodes headers, a metadata pool records rows or rolls staged files back.
//! Shutdown propagates by dropping senders in dependency order, so each stage
//! drains naturally once its upstream is done.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use fotovault_core::models::{UploadFile, UploadOutcome, UploadReport};
use fotovault_core::AppError;
use fotovault_storage::keys;

use super::upload::StagedFile;
use super::PhotoService;

impl PhotoService {
    /// Upload a batch of photos through the two-stage pipeline.
    ///
    /// `Err` means the batch could not start at all. Once the pipeline runs,
    /// per-file failures land in the report; callers classify the batch with
    /// [`UploadReport::aggregate_error`]. Outcome order follows completion,
    /// not submission.
    pub async fn upload_batch(
        &self,
        user_uuid: Uuid,
        files: Vec<UploadFile>,
    ) -> Result<UploadReport, AppError> {
        self.upload_batch_with_cancel(user_uuid, files, CancellationToken::new())
            .await
    }

    /// Like [`PhotoService::upload_batch`], stopping intake when `cancel`
    /// fires. Files the disk pool never pulled are not attempted and get no
    /// outcome; files already staged still complete their commit-or-rollback,
    /// so the report covers exactly the attempted files.
    pub async fn upload_batch_with_cancel(
        &self,
        user_uuid: Uuid,
        files: Vec<UploadFile>,
        cancel: CancellationToken,
    ) -> Result<UploadReport, AppError> {
        self.storage
            .ensure_namespace(&keys::user_namespace(&user_uuid))
            .await
            .map_err(|e| AppError::Storage(format!("Failed to prepare user namespace: {}", e)))?;

        let submitted = files.len();
        let queue_depth = self.pipeline.queue_depth.max(1);
        let disk_workers = self.pipeline.disk_workers.max(1);
        let metadata_workers = self.pipeline.metadata_workers.max(1);

        tracing::debug!(
            submitted,
            disk_workers,
            metadata_workers,
            queue_depth,
            "Starting batch upload"
        );

        let (file_tx, file_rx) = mpsc::channel::<UploadFile>(queue_depth);
        let (staged_tx, staged_rx) = mpsc::channel::<UploadOutcome>(queue_depth);
        let (result_tx, mut result_rx) = mpsc::channel::<UploadOutcome>(queue_depth);

        // Feeder: stops queueing on cancellation, then drops the sender so
        // the disk pool drains and exits.
        let feeder_cancel = cancel.clone();
        let feeder = tokio::spawn(async move {
            for file in files {
                tokio::select! {
                    biased;
                    _ = feeder_cancel.cancelled() => {
                        tracing::info!("Batch upload cancelled, no more files queued");
                        break;
                    }
                    res = file_tx.send(file) => {
                        if res.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        // Disk pool: write bytes and decode headers. Observes cancellation
        // between files.
        let file_rx = Arc::new(Mutex::new(file_rx));
        let mut workers = Vec::with_capacity(disk_workers + metadata_workers);
        for _ in 0..disk_workers {
            let svc = self.clone();
            let file_rx = Arc::clone(&file_rx);
            let staged_tx = staged_tx.clone();
            let cancel = cancel.clone();
            workers.push(tokio::spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let file = { file_rx.lock().await.recv().await };
                    let Some(file) = file else { break };

                    let outcome = match svc.stage_file(user_uuid, &file).await {
                        Ok(staged) => UploadOutcome::staged(
                            staged.filename,
                            staged.storage_key,
                            staged.size,
                            staged.width,
                            staged.height,
                        ),
                        Err(err) => {
                            tracing::warn!(filename = %file.filename, error = %err, "Disk stage failed");
                            UploadOutcome::failed(file.filename.clone(), err)
                        }
                    };
                    if staged_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(staged_tx);

        // Metadata pool: ignores cancellation and always drains its queue, so
        // every staged file ends up either committed or rolled back.
        let staged_rx = Arc::new(Mutex::new(staged_rx));
        for _ in 0..metadata_workers {
            let svc = self.clone();
            let staged_rx = Arc::clone(&staged_rx);
            let result_tx = result_tx.clone();
            workers.push(tokio::spawn(async move {
                loop {
                    let outcome = { staged_rx.lock().await.recv().await };
                    let Some(mut outcome) = outcome else { break };

                    let staged_key = if outcome.is_err() {
                        None
                    } else {
                        outcome.storage_key.clone()
                    };
                    if let Some(storage_key) = staged_key {
                        let staged = StagedFile {
                            filename: outcome.filename.clone(),
                            storage_key,
                            size: outcome.size,
                            width: outcome.width,
                            height: outcome.height,
                        };
                        match svc.persist_original(user_uuid, &staged).await {
                            Ok(photo_id) => outcome.photo_id = Some(photo_id),
                            Err(err) => outcome.set_error(err),
                        }
                    }
                    if result_tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            }));
        }
        drop(result_tx);

        // Collect until the metadata pool drops its last sender.
        let report = UploadReport::new();
        while let Some(outcome) = result_rx.recv().await {
            report.add(outcome).await;
        }

        feeder.await.ok();
        for worker in workers {
            worker.await.ok();
        }

        let total = report.total().await;
        let succeeded = report.success_count().await;
        match report.aggregate_error().await {
            Some(err) => tracing::warn!(
                submitted,
                total,
                succeeded,
                error = %err,
                "Batch upload finished with failures"
            ),
            None => tracing::info!(submitted, total, succeeded, "Batch upload finished"),
        }

        Ok(report)
    }
}
