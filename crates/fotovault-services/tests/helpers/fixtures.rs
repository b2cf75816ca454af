//! Image fixtures built with the real encoder, so decode paths see valid
//! files.

use std::io::Cursor;

/// Encode a PNG with the given dimensions.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([120, 30, 200, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("Failed to encode test PNG");
    buf.into_inner()
}

/// Encode a JPEG with the given dimensions.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("Failed to encode test JPEG");
    buf.into_inner()
}

/// Bytes no image decoder accepts.
pub fn not_an_image() -> Vec<u8> {
    b"these bytes are not an image".to_vec()
}
