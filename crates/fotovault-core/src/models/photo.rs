use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Photo version type enum
///
/// `Original` is the version created at upload time; the derived types exist
/// in the data model even though their generation lives elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "photo_version_type", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PhotoVersionType {
    Original,
    Thumbnail,
    Preview,
}

impl PhotoVersionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoVersionType::Original => "original",
            PhotoVersionType::Thumbnail => "thumbnail",
            PhotoVersionType::Preview => "preview",
        }
    }
}

impl fmt::Display for PhotoVersionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoVersionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(PhotoVersionType::Original),
            "thumbnail" => Ok(PhotoVersionType::Thumbnail),
            "preview" => Ok(PhotoVersionType::Preview),
            other => Err(AppError::InvalidVersionType(other.to_string())),
        }
    }
}

/// A user's photo. The `filename` is the sanitized client-supplied name kept
/// for display; bytes on disk live under generated names only.
///
/// A photo row never exists without at least its original version; creation
/// writes both in one transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Photo {
    pub id: i64,
    pub user_uuid: Uuid,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// One stored rendition of a photo. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PhotoVersion {
    pub id: i64,
    pub photo_id: i64,
    pub version_type: PhotoVersionType,
    pub storage_key: String,
    pub size: i64,
    pub width: i32,
    pub height: i32,
    pub saved_at: DateTime<Utc>,
}

/// Public-sharing record, at most one per photo. The token is the only
/// credential for public access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PublicationInfo {
    pub id: i64,
    pub photo_id: i64,
    pub public_token: String,
    pub published_at: DateTime<Utc>,
}

/// Parameters for the transactional photo + original-version insert.
#[derive(Debug, Clone)]
pub struct CreateOriginalPhoto {
    pub user_uuid: Uuid,
    pub filename: String,
    pub storage_key: String,
    pub size: i64,
    pub width: i32,
    pub height: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_type_parses_known_names() {
        assert_eq!(
            "original".parse::<PhotoVersionType>().unwrap(),
            PhotoVersionType::Original
        );
        assert_eq!(
            "thumbnail".parse::<PhotoVersionType>().unwrap(),
            PhotoVersionType::Thumbnail
        );
        assert_eq!(
            "preview".parse::<PhotoVersionType>().unwrap(),
            PhotoVersionType::Preview
        );
    }

    #[test]
    fn version_type_rejects_unknown_names() {
        let err = "huge".parse::<PhotoVersionType>().unwrap_err();
        assert!(matches!(err, AppError::InvalidVersionType(ref s) if s == "huge"));
        // Case matters: the wire form is lowercase.
        assert!("Original".parse::<PhotoVersionType>().is_err());
    }

    #[test]
    fn version_type_round_trips_display() {
        for vt in [
            PhotoVersionType::Original,
            PhotoVersionType::Thumbnail,
            PhotoVersionType::Preview,
        ] {
            assert_eq!(vt.to_string().parse::<PhotoVersionType>().unwrap(), vt);
        }
    }
}
