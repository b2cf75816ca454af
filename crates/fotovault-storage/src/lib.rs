//! Fotovault Storage Library
//!
//! Storage abstraction for photo bytes. The `Storage` trait is the only seam
//! the rest of the system sees; `LocalStorage` is the filesystem backend.
//!
//! # Storage key format
//!
//! Keys are user-scoped: `photos/{user_uuid}/{stored_name}`, where the stored
//! name is always generated (uuid + extension), never the client filename.
//! Keys must not contain `..` or a leading `/`. Key generation is centralized
//! in the `keys` module.

pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
