//! Where fonts come to life: loading and metrics for shahada
//!
//! One font family serves every field of a certificate, at several sizes.
//! A [`Font`] is loaded once and shared read-only between renders; the only
//! interior state it carries is a cache of glyph bounds, which is a pure
//! function of the font bytes.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kurbo::{BezPath, Shape};
use parking_lot::RwLock;
use read_fonts::{types::GlyphId, FontRef as ReadFontRef, TableProvider};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    MetadataProvider,
};

use shahada_core::{
    error::{ResourceError, Result},
    traits::FontRef,
    types::GlyphBounds,
};

/// A font that's been brought into memory, ready to lay out text
///
/// Stores the raw font data and creates a parser on demand.
/// For TTC collections, `face_index` selects the face.
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
    bounds: RwLock<HashMap<u32, Option<GlyphBounds>>>,
}

impl Font {
    /// Opens a font file from disk and makes it usable
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ResourceError::FontNotFound(path.display().to_string()),
            _ => ResourceError::FontUnreadable {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
        })?;

        Self::from_data_index(data, face_index)
    }

    /// Turns raw font bytes into something we can work with
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| ResourceError::InvalidFontData)?;

        // A font without a character map cannot draw any text
        font_ref.cmap().map_err(|_| ResourceError::InvalidFontData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        log::debug!(
            "Loaded font face {} ({} bytes, {} upem)",
            face_index,
            data.len(),
            units_per_em
        );

        Ok(Font {
            data,
            face_index,
            units_per_em,
            bounds: RwLock::new(HashMap::new()),
        })
    }

    /// Returns the face index for TTC collections (0 for single fonts)
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.cmap().ok()?.map_codepoint(ch).map(|gid| gid.to_u32()))
    }

    /// Advance in font units
    pub fn advance_width(&self, glyph_id: u32) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                hmtx.advance(GlyphId::new(glyph_id)).map(f32::from)
            })
            .unwrap_or(self.units_per_em as f32 / 2.0)
    }

    /// Exact outline bounds in font units, cached per glyph
    pub fn glyph_bounds(&self, glyph_id: u32) -> Option<GlyphBounds> {
        if let Some(cached) = self.bounds.read().get(&glyph_id) {
            return *cached;
        }

        let bounds = self.outline_bounds(glyph_id);
        self.bounds.write().insert(glyph_id, bounds);
        bounds
    }

    fn outline_bounds(&self, glyph_id: u32) -> Option<GlyphBounds> {
        let font = skrifa::FontRef::from_index(&self.data, self.face_index).ok()?;
        let glyph = font.outline_glyphs().get(skrifa::GlyphId::new(glyph_id))?;

        let mut pen = BezPen(BezPath::new());
        let settings = DrawSettings::unhinted(Size::unscaled(), LocationRef::default());
        if let Err(err) = glyph.draw(settings, &mut pen) {
            log::warn!("Outline of glyph {} unreadable: {:?}", glyph_id, err);
            return None;
        }

        if pen.0.elements().is_empty() {
            return None;
        }

        let rect = pen.0.bounding_box();
        if rect.width() <= 0.0 && rect.height() <= 0.0 {
            return None;
        }

        Some(GlyphBounds {
            x_min: rect.x0 as f32,
            y_min: rect.y0 as f32,
            x_max: rect.x1 as f32,
            y_max: rect.y1 as f32,
        })
    }

    /// Counts how many different glyphs this font contains
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }
}

impl FontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: u32) -> f32 {
        self.advance_width(glyph_id)
    }

    fn glyph_bounds(&self, glyph_id: u32) -> Option<GlyphBounds> {
        self.glyph_bounds(glyph_id)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count()
    }
}

/// Collects an outline into a kurbo path, in font units
struct BezPen(BezPath);

impl OutlinePen for BezPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.0.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.0.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.0.close_path();
    }
}

/// Fonts loaded so far, keyed by canonical path and face index
///
/// Safe to share between threads; a host keeps one of these for its lifetime
/// so every render reuses the same immutable font.
pub struct FontDatabase {
    path_cache: RwLock<HashMap<(PathBuf, u32), Arc<Font>>>,
}

impl FontDatabase {
    /// Starts with an empty library
    pub fn new() -> Self {
        Self {
            path_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Loads a font file, or returns the copy loaded earlier
    pub fn load_font(&self, path: impl AsRef<Path>) -> Result<Arc<Font>> {
        self.load_font_index(path, 0)
    }

    /// Loads one face of a font file, or returns the copy loaded earlier
    pub fn load_font_index(&self, path: impl AsRef<Path>, face_index: u32) -> Result<Arc<Font>> {
        let path = path.as_ref();
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let cache_key = (canonical, face_index);

        if let Some(font) = self.path_cache.read().get(&cache_key) {
            return Ok(font.clone());
        }

        let font = Arc::new(Font::from_file_index(path, face_index)?);
        log::debug!("loaded face {} of {}", face_index, path.display());
        let mut cache = self.path_cache.write();
        // Another thread may have won the race; keep its copy
        let font = cache.entry(cache_key).or_insert(font).clone();
        Ok(font)
    }

    /// Returns the number of fonts currently loaded
    pub fn font_count(&self) -> usize {
        self.path_cache.read().len()
    }

    /// Clears all loaded fonts
    pub fn clear(&self) {
        self.path_cache.write().clear();
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_database() {
        let db = FontDatabase::new();
        assert_eq!(db.font_count(), 0);
    }

    #[test]
    fn test_font_from_garbage_data() {
        let result = Font::from_data(vec![0; 100]);
        assert!(matches!(
            result,
            Err(shahada_core::ShahadaError::Resource(ResourceError::InvalidFontData))
        ));
    }

    #[test]
    fn test_missing_font_file_is_resource_error() {
        let db = FontDatabase::new();
        let err = db
            .load_font("/definitely/not/here/NotoKufiArabic-Bold.ttf")
            .err()
            .unwrap();
        assert!(err.is_resource());
        assert!(err.to_string().contains("NotoKufiArabic-Bold.ttf"));
        assert_eq!(db.font_count(), 0);
    }

    #[test]
    fn test_unreadable_font_file_is_not_reported_missing() {
        let err = Font::from_file(std::env::temp_dir()).err().unwrap();
        assert!(matches!(
            err,
            shahada_core::ShahadaError::Resource(ResourceError::FontUnreadable { .. })
        ));
        assert!(!err.to_string().contains("not found"));
    }
}
