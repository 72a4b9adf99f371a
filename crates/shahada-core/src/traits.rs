//! The contracts that bind the backends together
//!
//! - [`FontRef`] - Your window into font data and metrics
//! - [`GlyphLayout`] - Where visual text becomes positioned glyphs
//! - [`Renderer`] - Where glyphs become coverage
//! - [`Exporter`] - Where the finished canvas becomes bytes

use crate::{
    error::Result,
    types::{BitmapData, GlyphBounds, GlyphId, GlyphMask, GlyphRun},
    RenderParams, ShapingParams,
};
use shahada_unicode::ShapedText;
use std::sync::Arc;

/// Your key to unlocking font secrets
///
/// Implementations must be immutable once built: one font is shared by every
/// render running in parallel.
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         2048
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         1100.0
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    fn data(&self) -> &[u8];

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't contain this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// Horizontal advance in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// Tight outline bounds in font units (y-up)
    ///
    /// None for glyphs without ink, such as the space.
    fn glyph_bounds(&self, _glyph_id: GlyphId) -> Option<GlyphBounds> {
        None
    }

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }
}

/// Lays visual text out as a run of positioned glyphs
///
/// Input is always [`ShapedText`]: joining and reordering already happened,
/// so layouts advance strictly left to right.
pub trait GlyphLayout: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform visual characters into positioned glyphs
    fn layout(
        &self,
        text: &ShapedText,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<GlyphRun>;
}

/// Where glyphs become visible
pub trait Renderer: Send + Sync {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Rasterize a run into a coverage mask positioned relative to its pen origin
    fn render(
        &self,
        run: &GlyphRun,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<GlyphMask>;
}

/// The final step: pixels become bytes
pub trait Exporter: Send + Sync {
    /// Who are you?
    fn name(&self) -> &'static str;

    /// Encode a finished canvas
    fn export(&self, bitmap: &BitmapData) -> Result<Vec<u8>>;

    /// What file extension should be used?
    fn extension(&self) -> &'static str;

    /// What MIME type identifies your format?
    fn mime_type(&self) -> &'static str;
}
