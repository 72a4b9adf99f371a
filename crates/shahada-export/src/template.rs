//! Template decoding

use shahada_core::{
    error::{ResourceError, Result},
    types::{BitmapData, BitmapFormat},
};

/// Decode an encoded template image into an RGBA bitmap
///
/// Transparent template pixels keep their alpha here; the exporter flattens
/// the canvas to RGB at the very end.
pub fn decode_template(bytes: &[u8]) -> Result<BitmapData> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| ResourceError::TemplateDecode(e.to_string()))?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ResourceError::TemplateDecode(format!("empty image {width}x{height}")).into());
    }

    log::debug!("Decoded {}x{} template", width, height);

    Ok(BitmapData {
        width,
        height,
        format: BitmapFormat::Rgba8,
        data: rgba.into_raw(),
    })
}
