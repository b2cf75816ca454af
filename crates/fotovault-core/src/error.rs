//! Error types module
//!
//! This module provides the core error types used throughout the fotovault
//! application. All errors are unified under the `AppError` enum, which can
//! represent database, storage, validation, and domain-specific failures.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so non-database consumers can depend on this crate without pulling
//! in the database stack.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

use crate::validation::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for noteworthy but handled conditions
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
/// The HTTP layer maps errors to responses purely through this trait.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid version type: {0}")]
    InvalidVersionType(String),

    #[error("All {total} uploads failed")]
    AllFailed { total: usize },

    #[error("{failed} of {total} uploads failed")]
    PartialSuccess { total: usize, failed: usize },

    #[error("{cause} (rollback of staged file also failed: {rollback})")]
    RollbackFailed {
        #[source]
        cause: Box<AppError>,
        rollback: Box<AppError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Static metadata per variant: (http_status, error_code, sensitive, log_level).
/// `client_message` stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::Storage(_) => (500, "STORAGE_ERROR", true, LogLevel::Error),
        AppError::ImageDecode(_) => (400, "IMAGE_DECODE_ERROR", false, LogLevel::Warn),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::AccessDenied(_) => (403, "ACCESS_DENIED", false, LogLevel::Warn),
        AppError::Conflict(_) => (409, "CONFLICT", false, LogLevel::Debug),
        AppError::InvalidVersionType(_) => (400, "INVALID_VERSION_TYPE", false, LogLevel::Debug),
        AppError::AllFailed { .. } => (400, "UPLOAD_ALL_FAILED", false, LogLevel::Warn),
        AppError::PartialSuccess { .. } => (206, "UPLOAD_PARTIAL_SUCCESS", false, LogLevel::Warn),
        AppError::RollbackFailed { .. } => (500, "ROLLBACK_FAILED", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get detailed error information including the source chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::Storage(_) => "Failed to access storage".to_string(),
            AppError::ImageDecode(ref msg) => format!("Image could not be decoded: {}", msg),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::AccessDenied(_) => "You do not have access to this photo".to_string(),
            AppError::Conflict(ref msg) => msg.clone(),
            AppError::InvalidVersionType(ref msg) => {
                format!("Unknown photo version type: {}", msg)
            }
            AppError::AllFailed { total } => format!("All {} uploads failed", total),
            AppError::PartialSuccess { total, failed } => {
                format!("{} of {} uploads failed", failed, total)
            }
            AppError::RollbackFailed { .. } => "Internal server error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
