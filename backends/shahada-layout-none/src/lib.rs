//! None Layout - cmap lookups and advance widths, nothing more
//!
//! Joining and reordering already happened in the text shaper, so the only
//! job left is to walk the visual string left to right and advance the pen.
//! No kerning, no mark attachment: fonts whose outlines cannot be parsed
//! still lay out this way.

use std::sync::Arc;
use shahada_core::{
    error::Result,
    traits::{FontRef, GlyphLayout},
    types::{GlyphRun, PositionedGlyph},
    ShapedText, ShapingParams,
};

/// A minimal layout that only does simple LTR advancement
pub struct NoneLayout;

impl NoneLayout {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay glyphs out one character at a time, `.notdef` for unmapped characters
pub fn advance_layout(text: &str, font: &dyn FontRef, size: f32) -> GlyphRun {
    let mut glyphs = Vec::new();
    let mut x_advance = 0.0;
    let scale = size / font.units_per_em().max(1) as f32;
    let mut missing = 0usize;

    for (cluster, ch) in text.char_indices() {
        let glyph_id = match font.glyph_id(ch) {
            Some(id) => id,
            None => {
                missing += 1;
                0
            },
        };
        let advance = font.advance_width(glyph_id) * scale;

        glyphs.push(PositionedGlyph {
            id: glyph_id,
            x: x_advance,
            y: 0.0,
            cluster: cluster as u32,
        });

        x_advance += advance;
    }

    if missing > 0 {
        log::debug!("{} characters fell back to .notdef", missing);
    }

    GlyphRun {
        glyphs,
        advance_width: x_advance,
        size,
    }
}

impl GlyphLayout for NoneLayout {
    fn name(&self) -> &'static str {
        "none"
    }

    fn layout(
        &self,
        text: &ShapedText,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<GlyphRun> {
        log::debug!("NoneLayout: laying out {} chars", text.as_str().chars().count());
        Ok(advance_layout(text.as_str(), font.as_ref(), params.size))
    }
}
