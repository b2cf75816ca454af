//! Data models for the application
//!
//! Persistent photo entities live in `photo`; the transient types that flow
//! through an upload request live in `upload`.

mod photo;
mod upload;

// Re-export all models for convenient imports
pub use photo::*;
pub use upload::*;
