//! Test helpers: in-memory repository, fault-injecting storage, image
//! fixtures.
//!
//! Run with: `cargo test -p fotovault-services`
#![allow(dead_code)]

pub mod fixtures;
pub mod repo;
pub mod storage;

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;
use uuid::Uuid;

use fotovault_services::PhotoService;
use fotovault_storage::LocalStorage;

use self::repo::InMemoryPhotoRepository;

/// A photo service wired to an in-memory repository and tempdir-backed local
/// storage, with handles kept for assertions.
pub struct TestApp {
    pub service: PhotoService,
    pub repo: Arc<InMemoryPhotoRepository>,
    pub storage: Arc<LocalStorage>,
    pub storage_dir: TempDir,
}

pub async fn setup_service() -> TestApp {
    init_tracing();

    let repo = Arc::new(InMemoryPhotoRepository::new());
    let storage_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage = Arc::new(
        LocalStorage::new(storage_dir.path())
            .await
            .expect("Failed to create local storage"),
    );
    let service = PhotoService::new(repo.clone(), storage.clone());

    TestApp {
        service,
        repo,
        storage,
        storage_dir,
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Number of files sitting under the user's namespace on disk.
pub fn files_on_disk(root: &Path, user_uuid: &Uuid) -> usize {
    let dir = root.join("photos").join(user_uuid.to_string());
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}
