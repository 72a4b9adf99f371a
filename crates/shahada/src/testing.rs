//! Deterministic stand-ins for fonts and rasterizers in unit tests

use std::sync::Arc;

use shahada_core::{
    error::Result,
    traits::{FontRef, Renderer},
    types::{BitmapData, BitmapFormat, GlyphBounds, GlyphMask, GlyphRun},
    LogicalText, RenderParams, ScriptHint, ShapedText, TextShaper,
};

use crate::metrics::ink_box;

pub fn shaped(text: &str, hint: ScriptHint) -> ShapedText {
    TextShaper::new().shape(&LogicalText::from(text), hint)
}

/// Every character is its own glyph: 500 units wide, ink 50..450 by 0..700
///
/// Whitespace has no ink and `g` carries a 200-unit descender.
pub struct BlockFont;

impl FontRef for BlockFont {
    fn data(&self) -> &[u8] {
        &[]
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        Some(ch as u32)
    }

    fn advance_width(&self, _glyph_id: u32) -> f32 {
        500.0
    }

    fn glyph_bounds(&self, glyph_id: u32) -> Option<GlyphBounds> {
        let ch = char::from_u32(glyph_id)?;
        if ch.is_whitespace() {
            return None;
        }
        let y_min = if ch == 'g' { -200.0 } else { 0.0 };
        Some(GlyphBounds {
            x_min: 50.0,
            y_min,
            x_max: 450.0,
            y_max: 700.0,
        })
    }
}

/// Paints the pixel-snapped ink box of a run fully opaque
pub struct BlockRenderer;

impl Renderer for BlockRenderer {
    fn name(&self) -> &'static str {
        "block"
    }

    fn render(
        &self,
        run: &GlyphRun,
        font: Arc<dyn FontRef>,
        _params: &RenderParams,
    ) -> Result<GlyphMask> {
        let ink = ink_box(run, font.as_ref());
        if ink.is_empty() {
            return Ok(GlyphMask::empty());
        }

        let left = ink.left.floor() as i32;
        let top = ink.top.floor() as i32;
        let width = (ink.right().ceil() as i32 - left) as u32;
        let height = (ink.bottom().ceil() as i32 - top) as u32;

        Ok(GlyphMask {
            bitmap: BitmapData {
                width,
                height,
                format: BitmapFormat::Gray8,
                data: vec![255; (width * height) as usize],
            },
            left,
            top,
        })
    }
}
