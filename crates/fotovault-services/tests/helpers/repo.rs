//! In-memory photo repository with per-filename failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use fotovault_core::models::{
    CreateOriginalPhoto, Photo, PhotoVersion, PhotoVersionType, PublicationInfo,
};
use fotovault_core::AppError;
use fotovault_db::PhotoRepository;

#[derive(Default)]
struct RepoState {
    next_photo_id: i64,
    next_row_id: i64,
    photos: HashMap<i64, Photo>,
    versions: Vec<PhotoVersion>,
    publications: HashMap<i64, PublicationInfo>,
    fail_create_for: Vec<String>,
}

/// In-memory stand-in for the Postgres repository, honoring the same error
/// mapping contract.
#[derive(Default)]
pub struct InMemoryPhotoRepository {
    state: Mutex<RepoState>,
    token_lookups: AtomicUsize,
}

impl InMemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_original_photo` fail for this display filename.
    pub async fn fail_create_for(&self, filename: &str) {
        self.state
            .lock()
            .await
            .fail_create_for
            .push(filename.to_string());
    }

    pub async fn photo_count(&self) -> usize {
        self.state.lock().await.photos.len()
    }

    /// Insert a photo row directly, without any version.
    pub async fn seed_photo(&self, user_uuid: Uuid) -> i64 {
        let mut state = self.state.lock().await;
        state.next_photo_id += 1;
        let id = state.next_photo_id;
        state.photos.insert(
            id,
            Photo {
                id,
                user_uuid,
                filename: format!("seeded-{}.png", id),
                uploaded_at: Utc::now(),
            },
        );
        id
    }

    /// Insert a version row directly.
    pub async fn seed_version(
        &self,
        photo_id: i64,
        version_type: PhotoVersionType,
        storage_key: &str,
        size: i64,
    ) {
        let mut state = self.state.lock().await;
        state.next_row_id += 1;
        let id = state.next_row_id;
        state.versions.push(PhotoVersion {
            id,
            photo_id,
            version_type,
            storage_key: storage_key.to_string(),
            size,
            width: 8,
            height: 8,
            saved_at: Utc::now(),
        });
    }

    /// Publish directly and return the token.
    pub async fn seed_publication(&self, photo_id: i64) -> String {
        let mut state = self.state.lock().await;
        state.next_row_id += 1;
        let info = PublicationInfo {
            id: state.next_row_id,
            photo_id,
            public_token: Uuid::new_v4().simple().to_string(),
            published_at: Utc::now(),
        };
        let token = info.public_token.clone();
        state.publications.insert(photo_id, info);
        token
    }

    /// Number of times `get_version_by_token` was called.
    pub fn token_lookups(&self) -> usize {
        self.token_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn create_original_photo(&self, params: &CreateOriginalPhoto) -> Result<i64, AppError> {
        let mut state = self.state.lock().await;
        if state.fail_create_for.contains(&params.filename) {
            return Err(AppError::Internal("simulated insert failure".to_string()));
        }

        state.next_photo_id += 1;
        let photo_id = state.next_photo_id;
        state.photos.insert(
            photo_id,
            Photo {
                id: photo_id,
                user_uuid: params.user_uuid,
                filename: params.filename.clone(),
                uploaded_at: Utc::now(),
            },
        );

        state.next_row_id += 1;
        let version_id = state.next_row_id;
        state.versions.push(PhotoVersion {
            id: version_id,
            photo_id,
            version_type: PhotoVersionType::Original,
            storage_key: params.storage_key.clone(),
            size: params.size,
            width: params.width,
            height: params.height,
            saved_at: Utc::now(),
        });

        Ok(photo_id)
    }

    async fn get_photo_by_id(&self, photo_id: i64) -> Result<Photo, AppError> {
        self.state
            .lock()
            .await
            .photos
            .get(&photo_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("photo {} not found", photo_id)))
    }

    async fn get_photo_versions(&self, photo_id: i64) -> Result<Vec<PhotoVersion>, AppError> {
        let state = self.state.lock().await;
        let mut versions: Vec<PhotoVersion> = state
            .versions
            .iter()
            .filter(|v| v.photo_id == photo_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.size);
        Ok(versions)
    }

    async fn get_version_by_token(
        &self,
        token: &str,
        version_type: PhotoVersionType,
    ) -> Result<PhotoVersion, AppError> {
        self.token_lookups.fetch_add(1, Ordering::SeqCst);

        let state = self.state.lock().await;
        let photo_id = state
            .publications
            .values()
            .find(|p| p.public_token == token)
            .map(|p| p.photo_id)
            .ok_or_else(|| AppError::NotFound("publication not found".to_string()))?;
        state
            .versions
            .iter()
            .find(|v| v.photo_id == photo_id && v.version_type == version_type)
            .cloned()
            .ok_or_else(|| {
                AppError::NotFound(format!("no {} version for photo {}", version_type, photo_id))
            })
    }

    async fn create_publication(&self, photo_id: i64) -> Result<PublicationInfo, AppError> {
        let mut state = self.state.lock().await;
        if state.publications.contains_key(&photo_id) {
            return Err(AppError::Conflict(format!(
                "photo {} is already published",
                photo_id
            )));
        }

        state.next_row_id += 1;
        let info = PublicationInfo {
            id: state.next_row_id,
            photo_id,
            public_token: Uuid::new_v4().simple().to_string(),
            published_at: Utc::now(),
        };
        state.publications.insert(photo_id, info.clone());
        Ok(info)
    }

    async fn delete_publication(&self, photo_id: i64) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        state
            .publications
            .remove(&photo_id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("photo {} is not published", photo_id)))
    }
}
