use fotovault_core::models::{
    CreateOriginalPhoto, Photo, PhotoVersion, PhotoVersionType, PublicationInfo,
};
use fotovault_core::AppError;

/// Trait for photo metadata operations
/// This abstracts the database implementation (PostgreSQL)
///
/// Error mapping is part of the contract:
/// - lookups return `AppError::NotFound` for absent rows, never a bare
///   database error
/// - `create_publication` returns `AppError::Conflict` when the photo already
///   has a publication
/// - `delete_publication` returns `AppError::NotFound` when nothing was
///   deleted
#[async_trait::async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Insert the photo row and its original version in one transaction,
    /// returning the new photo id.
    async fn create_original_photo(&self, params: &CreateOriginalPhoto) -> Result<i64, AppError>;

    async fn get_photo_by_id(&self, photo_id: i64) -> Result<Photo, AppError>;

    /// All versions of a photo, ordered by ascending byte size. An empty list
    /// is a valid result.
    async fn get_photo_versions(&self, photo_id: i64) -> Result<Vec<PhotoVersion>, AppError>;

    /// Resolve a published photo version through its public token.
    async fn get_version_by_token(
        &self,
        token: &str,
        version_type: PhotoVersionType,
    ) -> Result<PhotoVersion, AppError>;

    /// Publish a photo: create its publication record with a fresh random
    /// token and return the stored row.
    async fn create_publication(&self, photo_id: i64) -> Result<PublicationInfo, AppError>;

    /// Remove a photo's publication record.
    async fn delete_publication(&self, photo_id: i64) -> Result<(), AppError>;
}
