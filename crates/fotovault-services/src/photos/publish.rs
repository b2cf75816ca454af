//! Publication management.

use uuid::Uuid;

use fotovault_core::AppError;

use super::PhotoService;

impl PhotoService {
    /// Publish a photo and return its public token. Publishing an already
    /// published photo is a conflict and leaves the existing token valid.
    pub async fn publish(&self, user_uuid: Uuid, photo_id: i64) -> Result<String, AppError> {
        self.authorize_photo(user_uuid, photo_id).await?;

        let info = self.repo.create_publication(photo_id).await?;

        tracing::info!(photo_id, user_uuid = %user_uuid, "Photo published");

        Ok(info.public_token)
    }

    /// Withdraw a photo's publication. Unpublishing a photo that was never
    /// published reports NotFound.
    pub async fn unpublish(&self, user_uuid: Uuid, photo_id: i64) -> Result<(), AppError> {
        self.authorize_photo(user_uuid, photo_id).await?;

        self.repo.delete_publication(photo_id).await?;

        tracing::info!(photo_id, user_uuid = %user_uuid, "Photo unpublished");

        Ok(())
    }
}
