use fotovault_core::models::{
    CreateOriginalPhoto, Photo, PhotoVersion, PhotoVersionType, PublicationInfo,
};
use fotovault_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::repository::PhotoRepository;

const MAX_CONNECTIONS: u32 = 10;

/// PostgreSQL photo repository
#[derive(Clone)]
pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and build a repository over a fresh pool.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Apply embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
        }
        _ => false,
    }
}

#[async_trait::async_trait]
impl PhotoRepository for PgPhotoRepository {
    #[tracing::instrument(
        skip(self, params),
        fields(db.table = "photos", db.operation = "insert", user_uuid = %params.user_uuid)
    )]
    async fn create_original_photo(&self, params: &CreateOriginalPhoto) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let photo_id: i64 = sqlx::query_scalar::<Postgres, i64>(
            "INSERT INTO photos (user_uuid, filename) VALUES ($1, $2) RETURNING id",
        )
        .bind(params.user_uuid)
        .bind(&params.filename)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO photo_versions (photo_id, version_type, storage_key, size, width, height)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(photo_id)
        .bind(PhotoVersionType::Original)
        .bind(&params.storage_key)
        .bind(params.size)
        .bind(params.width)
        .bind(params.height)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(photo_id, "Created photo with original version");

        Ok(photo_id)
    }

    async fn get_photo_by_id(&self, photo_id: i64) -> Result<Photo, AppError> {
        let photo: Option<Photo> = sqlx::query_as::<Postgres, Photo>(
            "SELECT id, user_uuid, filename, uploaded_at FROM photos WHERE id = $1",
        )
        .bind(photo_id)
        .fetch_optional(&self.pool)
        .await?;

        photo.ok_or_else(|| AppError::NotFound(format!("photo {} not found", photo_id)))
    }

    async fn get_photo_versions(&self, photo_id: i64) -> Result<Vec<PhotoVersion>, AppError> {
        let versions = sqlx::query_as::<Postgres, PhotoVersion>(
            r#"
            SELECT id, photo_id, version_type, storage_key, size, width, height, saved_at
            FROM photo_versions
            WHERE photo_id = $1
            ORDER BY size ASC
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(versions)
    }

    async fn get_version_by_token(
        &self,
        token: &str,
        version_type: PhotoVersionType,
    ) -> Result<PhotoVersion, AppError> {
        let version: Option<PhotoVersion> = sqlx::query_as::<Postgres, PhotoVersion>(
            r#"
            SELECT v.id, v.photo_id, v.version_type, v.storage_key, v.size, v.width, v.height, v.saved_at
            FROM photo_versions v
            JOIN published_photo_info p ON p.photo_id = v.photo_id
            WHERE p.public_token = $1 AND v.version_type = $2
            "#,
        )
        .bind(token)
        .bind(version_type)
        .fetch_optional(&self.pool)
        .await?;

        version.ok_or_else(|| {
            AppError::NotFound(format!("no published {} version for this token", version_type))
        })
    }

    #[tracing::instrument(
        skip(self),
        fields(db.table = "published_photo_info", db.operation = "insert", db.record_id = %photo_id)
    )]
    async fn create_publication(&self, photo_id: i64) -> Result<PublicationInfo, AppError> {
        let token = Uuid::new_v4().simple().to_string();

        let info = sqlx::query_as::<Postgres, PublicationInfo>(
            r#"
            INSERT INTO published_photo_info (photo_id, public_token)
            VALUES ($1, $2)
            RETURNING id, photo_id, public_token, published_at
            "#,
        )
        .bind(photo_id)
        .bind(&token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("photo {} is already published", photo_id))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(info)
    }

    async fn delete_publication(&self, photo_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM published_photo_info WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "photo {} is not published",
                photo_id
            )));
        }

        Ok(())
    }
}
