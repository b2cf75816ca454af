//! Upload validation
//!
//! Size and extension checks applied before any bytes touch storage, plus
//! filename sanitation for the display name kept in metadata.

use std::path::Path;

/// Common validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    ExtensionNotAllowed {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

pub const DEFAULT_MAX_FILE_SIZE: usize = 50 * 1024 * 1024;

pub fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png"].iter().map(|s| s.to_string()).collect()
}

/// Uploaded-file validator
///
/// Holds the acceptance rules in one place so the single and batch flows
/// cannot drift apart.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl Default for UploadValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE, default_allowed_extensions())
    }
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension
    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = file_extension(filename)
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::ExtensionNotAllowed {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Run all checks for one file
    pub fn validate(&self, filename: &str, size: usize) -> Result<(), ValidationError> {
        self.validate_file_size(size)?;
        self.validate_extension(filename)?;
        Ok(())
    }
}

/// Lowercased file extension, if any.
pub fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Sanitize a client filename for display storage. Never used to build disk
/// paths; stored objects get generated names.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX: usize = 255;
    let path = Path::new(filename);
    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if base.contains("..") {
        return "invalid_filename".to_string();
    }
    let s: String = base
        .chars()
        .take(MAX)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if s.trim().is_empty() || s.len() < 3 {
        "file".to_string()
    } else {
        s
    }
}
