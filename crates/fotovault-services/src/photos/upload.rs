//! Single-file upload flow.

use uuid::Uuid;

use fotovault_core::models::{CreateOriginalPhoto, UploadFile};
use fotovault_core::validation::file_extension;
use fotovault_core::{sanitize_filename, AppError};
use fotovault_storage::keys;

use super::decode::decode_dimensions;
use super::PhotoService;

/// A file whose bytes reached the store, with everything the metadata write
/// needs.
#[derive(Debug, Clone)]
pub(crate) struct StagedFile {
    pub filename: String,
    pub storage_key: String,
    pub size: i64,
    pub width: u32,
    pub height: u32,
}

impl PhotoService {
    /// Upload one photo and return its id.
    ///
    /// The bytes are staged under a generated name first; the metadata row is
    /// written second. A metadata failure rolls the staged file back, so no
    /// orphaned bytes survive a failed upload.
    pub async fn upload_photo(&self, user_uuid: Uuid, file: UploadFile) -> Result<i64, AppError> {
        self.storage
            .ensure_namespace(&keys::user_namespace(&user_uuid))
            .await
            .map_err(|e| AppError::Storage(format!("Failed to prepare user namespace: {}", e)))?;

        let staged = self.stage_file(user_uuid, &file).await?;
        let photo_id = self.persist_original(user_uuid, &staged).await?;

        tracing::info!(
            photo_id,
            user_uuid = %user_uuid,
            filename = %staged.filename,
            size_bytes = staged.size,
            "Photo uploaded"
        );

        Ok(photo_id)
    }

    /// Validate the file, write its bytes under a generated name and decode
    /// the image header. On decode failure the just-written bytes are removed
    /// again; nothing durable remains.
    pub(crate) async fn stage_file(
        &self,
        user_uuid: Uuid,
        file: &UploadFile,
    ) -> Result<StagedFile, AppError> {
        self.validator.validate(&file.filename, file.size())?;

        // validate() already requires an allowed extension to be present.
        let extension = file_extension(&file.filename).ok_or_else(|| {
            AppError::InvalidInput(format!("no file extension: {}", file.filename))
        })?;
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let storage_key = keys::photo_key(&user_uuid, &stored_name);

        if self
            .storage
            .exists(&storage_key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to check {}: {}", storage_key, e)))?
        {
            return Err(AppError::Conflict(format!(
                "storage key already taken: {}",
                storage_key
            )));
        }

        self.storage
            .write(&storage_key, file.data.clone())
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", storage_key, e)))?;

        let (width, height) = match decode_dimensions(file.data.clone()).await {
            Ok(dims) => dims,
            Err(decode_err) => {
                if let Err(cleanup_err) = self.storage.delete(&storage_key).await {
                    tracing::warn!(
                        storage_key = %storage_key,
                        error = %cleanup_err,
                        "Failed to remove staged file after decode error"
                    );
                }
                return Err(decode_err);
            }
        };

        Ok(StagedFile {
            filename: sanitize_filename(&file.filename),
            storage_key,
            size: file.size() as i64,
            width,
            height,
        })
    }

    /// Record the photo and its original version in one transaction. On
    /// failure the staged file is rolled back; a rollback that itself fails
    /// surfaces both errors.
    pub(crate) async fn persist_original(
        &self,
        user_uuid: Uuid,
        staged: &StagedFile,
    ) -> Result<i64, AppError> {
        let params = CreateOriginalPhoto {
            user_uuid,
            filename: staged.filename.clone(),
            storage_key: staged.storage_key.clone(),
            size: staged.size,
            width: staged.width as i32,
            height: staged.height as i32,
        };

        match self.repo.create_original_photo(&params).await {
            Ok(photo_id) => Ok(photo_id),
            Err(db_err) => {
                tracing::warn!(
                    storage_key = %staged.storage_key,
                    error = %db_err,
                    "Metadata write failed, rolling back staged file"
                );
                match self.storage.delete(&staged.storage_key).await {
                    Ok(()) => Err(db_err),
                    Err(cleanup_err) => Err(AppError::RollbackFailed {
                        cause: Box::new(db_err),
                        rollback: Box::new(AppError::Storage(cleanup_err.to_string())),
                    }),
                }
            }
        }
    }
}
