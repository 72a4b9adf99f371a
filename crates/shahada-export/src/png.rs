//! PNG export format
//!
//! Certificates are opaque, so the encoder always writes 8-bit RGB and drops
//! any alpha channel the canvas carries.

use image::{ImageEncoder, RgbImage};
use shahada_core::{
    error::{ExportError, Result},
    traits::Exporter,
    types::{BitmapData, BitmapFormat},
};

/// Encode bitmap data to an RGB PNG
pub fn encode_bitmap_to_png(bitmap: &BitmapData) -> Result<Vec<u8>> {
    let pixels = bitmap.width as usize * bitmap.height as usize;
    let expected_size = pixels * bitmap.bytes_per_pixel();

    if bitmap.data.len() < expected_size {
        return Err(ExportError::EncodingFailed(format!(
            "Buffer too small: expected {} bytes for {}x{} {:?}, got {}",
            expected_size,
            bitmap.width,
            bitmap.height,
            bitmap.format,
            bitmap.data.len()
        ))
        .into());
    }

    let rgb_data: Vec<u8> = match bitmap.format {
        BitmapFormat::Rgb8 => bitmap.data[..expected_size].to_vec(),
        BitmapFormat::Rgba8 => bitmap.data[..expected_size]
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect(),
        BitmapFormat::Gray8 => bitmap.data[..expected_size]
            .iter()
            .flat_map(|&gray| [gray, gray, gray])
            .collect(),
    };

    let img = RgbImage::from_raw(bitmap.width, bitmap.height, rgb_data).ok_or_else(|| {
        ExportError::EncodingFailed("Failed to create image buffer from pixel data".into())
    })?;

    let mut png_data = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        &mut png_data,
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Sub,
    );

    encoder
        .write_image(img.as_raw(), bitmap.width, bitmap.height, image::ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

    log::debug!(
        "Encoded {}x{} certificate into {} PNG bytes",
        bitmap.width,
        bitmap.height,
        png_data.len()
    );

    Ok(png_data)
}

/// PNG exporter for finished certificates
///
/// ```
/// use shahada_core::Exporter;
/// use shahada_export::PngExporter;
///
/// let exporter = PngExporter::new();
/// assert_eq!(exporter.extension(), "png");
/// ```
pub struct PngExporter;

impl PngExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PngExporter {
    fn name(&self) -> &'static str {
        "png"
    }

    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>> {
        encode_bitmap_to_png(bitmap)
    }

    fn extension(&self) -> &'static str {
        "png"
    }

    fn mime_type(&self) -> &'static str {
        "image/png"
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self::new()
    }
}
