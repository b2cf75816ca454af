//! Fotovault Services Library
//!
//! Orchestration layer between blob storage and photo metadata: single and
//! batch upload, version resolution, and publication management.

pub mod photos;

pub use photos::{PhotoService, PipelineOptions};
