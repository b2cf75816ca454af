//! Application configuration
//!
//! Environment-driven configuration with sensible defaults. Only
//! `DATABASE_URL` is required; everything else falls back to the constants
//! below.

use std::env;

use anyhow::Context;

use crate::validation::{default_allowed_extensions, DEFAULT_MAX_FILE_SIZE};

const DEFAULT_STORAGE_ROOT: &str = "./data";
const DEFAULT_METADATA_WORKERS: usize = 4;
const DEFAULT_UPLOAD_QUEUE_DEPTH: usize = 16;

#[derive(Debug, Clone)]
pub struct Config {
    database_url: String,
    storage_root: String,
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    upload_disk_workers: usize,
    upload_metadata_workers: usize,
    upload_queue_depth: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let storage_root =
            env::var("STORAGE_ROOT").unwrap_or_else(|_| DEFAULT_STORAGE_ROOT.to_string());

        let max_file_size = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(DEFAULT_MAX_FILE_SIZE);

        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| default_allowed_extensions());

        let upload_disk_workers = env::var("UPLOAD_DISK_WORKERS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_disk_workers);

        let upload_metadata_workers = env::var("UPLOAD_METADATA_WORKERS")
            .unwrap_or_else(|_| DEFAULT_METADATA_WORKERS.to_string())
            .parse()
            .unwrap_or(DEFAULT_METADATA_WORKERS);

        let upload_queue_depth = env::var("UPLOAD_QUEUE_DEPTH")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_QUEUE_DEPTH.to_string())
            .parse()
            .unwrap_or(DEFAULT_UPLOAD_QUEUE_DEPTH);

        Ok(Self {
            database_url,
            storage_root,
            max_file_size,
            allowed_extensions,
            upload_disk_workers: upload_disk_workers.max(1),
            upload_metadata_workers: upload_metadata_workers.max(1),
            upload_queue_depth: upload_queue_depth.max(1),
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn storage_root(&self) -> &str {
        &self.storage_root
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn upload_disk_workers(&self) -> usize {
        self.upload_disk_workers
    }

    pub fn upload_metadata_workers(&self) -> usize {
        self.upload_metadata_workers
    }

    pub fn upload_queue_depth(&self) -> usize {
        self.upload_queue_depth
    }
}

/// Disk writes are the contended stage; use half the cores, at least one.
pub fn default_disk_workers() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2);
    (cores / 2).max(1)
}
