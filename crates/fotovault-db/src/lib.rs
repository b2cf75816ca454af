//! Fotovault Database Library
//!
//! PostgreSQL metadata store for photos, their versions, and publication
//! records. The `PhotoRepository` trait is the seam the service layer depends
//! on; `PgPhotoRepository` is the production implementation.

pub mod postgres;
pub mod repository;

// Re-export commonly used types
pub use postgres::{run_migrations, PgPhotoRepository};
pub use repository::PhotoRepository;
