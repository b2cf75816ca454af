//! Version resolution: owner-facing listings and token-based public reads.

use uuid::Uuid;

use fotovault_core::models::{PhotoVersion, PhotoVersionType};
use fotovault_core::AppError;

use super::PhotoService;

impl PhotoService {
    /// List all stored versions of a photo, smallest first. The photo must
    /// belong to the caller; a photo without versions yields an empty list.
    pub async fn get_versions(
        &self,
        user_uuid: Uuid,
        photo_id: i64,
    ) -> Result<Vec<PhotoVersion>, AppError> {
        self.authorize_photo(user_uuid, photo_id).await?;
        self.repo.get_photo_versions(photo_id).await
    }

    /// Resolve a published photo by token and version name and return the
    /// version row together with its bytes. Possession of the token is the
    /// only authorization check.
    pub async fn get_public_file(
        &self,
        token: &str,
        version_name: &str,
    ) -> Result<(PhotoVersion, Vec<u8>), AppError> {
        // Parse first; an unknown version name never reaches the store.
        let version_type: PhotoVersionType = version_name.parse()?;

        let version = self.repo.get_version_by_token(token, version_type).await?;

        let data = self
            .storage
            .read(&version.storage_key)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to read {}: {}", version.storage_key, e))
            })?;

        // Bytes and metadata must agree; anything else means corruption.
        if data.len() as i64 != version.size {
            return Err(AppError::Internal(format!(
                "stored object {} is {} bytes, metadata says {}",
                version.storage_key,
                data.len(),
                version.size
            )));
        }

        Ok((version, data))
    }
}
