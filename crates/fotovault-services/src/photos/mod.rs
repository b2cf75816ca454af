//! Photo service.
//!
//! Every mutating flow follows the same two-step shape: bytes reach the
//! storage backend first, the metadata row is written second, and a metadata
//! failure rolls the staged bytes back. Reads go the other way around.

use std::sync::Arc;

use uuid::Uuid;

use fotovault_core::models::Photo;
use fotovault_core::{AppError, Config, UploadValidator};
use fotovault_db::PhotoRepository;
use fotovault_storage::Storage;

mod batch;
mod decode;
mod publish;
mod upload;
mod versions;

/// Worker and queue sizing for the batch ingestion pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Workers writing bytes to the storage backend and decoding headers.
    pub disk_workers: usize,
    /// Workers recording metadata rows (or rolling staged files back).
    pub metadata_workers: usize,
    /// Capacity of each queue between pipeline stages.
    pub queue_depth: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            disk_workers: fotovault_core::config::default_disk_workers(),
            metadata_workers: 4,
            queue_depth: 16,
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            disk_workers: config.upload_disk_workers(),
            metadata_workers: config.upload_metadata_workers(),
            queue_depth: config.upload_queue_depth(),
        }
    }
}

/// Service for photo upload, version resolution and publication.
///
/// Cloning is cheap; batch workers run on clones of the service.
#[derive(Clone)]
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository>,
    storage: Arc<dyn Storage>,
    validator: UploadValidator,
    pipeline: PipelineOptions,
}

impl PhotoService {
    pub fn new(repo: Arc<dyn PhotoRepository>, storage: Arc<dyn Storage>) -> Self {
        Self::with_options(
            repo,
            storage,
            UploadValidator::default(),
            PipelineOptions::default(),
        )
    }

    pub fn with_options(
        repo: Arc<dyn PhotoRepository>,
        storage: Arc<dyn Storage>,
        validator: UploadValidator,
        pipeline: PipelineOptions,
    ) -> Self {
        Self {
            repo,
            storage,
            validator,
            pipeline,
        }
    }

    pub fn from_config(
        repo: Arc<dyn PhotoRepository>,
        storage: Arc<dyn Storage>,
        config: &Config,
    ) -> Self {
        Self::with_options(
            repo,
            storage,
            UploadValidator::new(config.max_file_size(), config.allowed_extensions().to_vec()),
            PipelineOptions::from_config(config),
        )
    }

    /// Fetch a photo and verify the caller owns it.
    pub(crate) async fn authorize_photo(
        &self,
        user_uuid: Uuid,
        photo_id: i64,
    ) -> Result<Photo, AppError> {
        let photo = self.repo.get_photo_by_id(photo_id).await?;
        if photo.user_uuid != user_uuid {
            return Err(AppError::AccessDenied(format!(
                "photo {} belongs to another user",
                photo_id
            )));
        }
        Ok(photo)
    }
}
