//! Image header decoding.

use std::io::Cursor;

use bytes::Bytes;
use image::{GenericImageView, ImageReader};

use fotovault_core::AppError;

/// Decode the image and return its pixel dimensions.
///
/// Decode is CPU-bound; run it off the async pool so upload workers keep
/// moving while large images are parsed.
pub(crate) async fn decode_dimensions(data: Bytes) -> Result<(u32, u32), AppError> {
    tokio::task::spawn_blocking(move || {
        let reader = ImageReader::new(Cursor::new(data.as_ref()))
            .with_guessed_format()
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;
        let img = reader
            .decode()
            .map_err(|e| AppError::ImageDecode(e.to_string()))?;
        Ok(img.dimensions())
    })
    .await
    .map_err(|e| AppError::Internal(format!("Image decode task failed: {}", e)))?
}
