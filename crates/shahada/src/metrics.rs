//! Metrics oracle: how much room shaped text really takes
//!
//! Measurements come from glyph outlines, not advance widths, so the box is
//! the ink a renderer will actually put down. Boxes are in pixels, y-down,
//! relative to the pen origin on the baseline.

use std::sync::Arc;

use shahada_core::{
    error::Result,
    traits::{FontRef, GlyphLayout},
    types::{GlyphRun, TextBox},
    ShapedText, ShapingParams,
};

/// One font at one size
#[derive(Clone)]
pub struct SizedFont {
    pub font: Arc<dyn FontRef>,
    /// Pixels per em
    pub size: f32,
}

impl SizedFont {
    pub fn new(font: Arc<dyn FontRef>, size: f32) -> Self {
        Self { font, size }
    }
}

impl std::fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizedFont")
            .field("upem", &self.font.units_per_em())
            .field("size", &self.size)
            .finish()
    }
}

/// Measures shaped text by laying it out and unioning glyph outlines
pub struct TextMeasurer {
    layout: Arc<dyn GlyphLayout>,
}

impl TextMeasurer {
    pub fn new(layout: Arc<dyn GlyphLayout>) -> Self {
        Self { layout }
    }

    /// Positioned glyphs for shaped text at the font's size
    pub fn layout(&self, text: &ShapedText, font: &SizedFont) -> Result<GlyphRun> {
        self.layout
            .layout(text, font.font.clone(), &ShapingParams::sized(font.size))
    }

    /// Tight ink box of the rendered glyphs
    pub fn measure(&self, text: &ShapedText, font: &SizedFont) -> Result<TextBox> {
        let run = self.layout(text, font)?;
        Ok(ink_box(&run, font.font.as_ref()))
    }

    pub fn layout_name(&self) -> &'static str {
        self.layout.name()
    }
}

/// Union of the outline bounds of every inked glyph in a run
///
/// Glyphs without ink contribute nothing, so a run of spaces measures as an
/// empty box at the origin.
pub fn ink_box(run: &GlyphRun, font: &dyn FontRef) -> TextBox {
    let scale = run.size / font.units_per_em().max(1) as f32;

    run.glyphs
        .iter()
        .filter_map(|glyph| {
            let bounds = font.glyph_bounds(glyph.id)?;
            Some(TextBox::from_edges(
                glyph.x + bounds.x_min * scale,
                -(glyph.y + bounds.y_max * scale),
                glyph.x + bounds.x_max * scale,
                -(glyph.y + bounds.y_min * scale),
            ))
        })
        .fold(TextBox::default(), |acc, glyph_box| acc.union(&glyph_box))
}
