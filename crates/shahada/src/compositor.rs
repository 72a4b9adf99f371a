//! Putting shaped text onto the canvas
//!
//! Every field, fixed or wrapped, follows one centring rule: measure the ink
//! box of the shaped text and place its top-left corner at
//! `(x - w / 2, y - h / 2)` with integer floor division. The renderer gets a
//! pen origin shifted by the sub-pixel remainder, so the ink lands exactly
//! where the measurement said it would.

use std::sync::Arc;

use shahada_core::{
    error::{ConfigError, Result},
    traits::{GlyphLayout, Renderer},
    types::{BitmapData, BitmapFormat, GlyphMask, GlyphRun, TextBox},
    Color, LogicalText, RenderParams, ScriptHint, ShapedText, TextShaper,
};

use crate::config::BodyRegion;
use crate::metrics::{ink_box, SizedFont, TextMeasurer};
use crate::wrap::LineWrapper;

/// The mutable RGBA surface one render draws on
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    bitmap: BitmapData,
}

impl Canvas {
    /// A blank canvas filled with one colour
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConfigError::Invalid(format!("empty canvas {width}x{height}")).into());
        }
        let pixel = [background.r, background.g, background.b, background.a];
        Ok(Self {
            bitmap: BitmapData {
                width,
                height,
                format: BitmapFormat::Rgba8,
                data: pixel.repeat(width as usize * height as usize),
            },
        })
    }

    /// Wrap existing pixels, converting them to RGBA when needed
    pub fn from_bitmap(bitmap: BitmapData) -> Result<Self> {
        let pixels = bitmap.width as usize * bitmap.height as usize;
        if pixels == 0 || bitmap.data.len() < pixels * bitmap.bytes_per_pixel() {
            return Err(ConfigError::Invalid(format!(
                "canvas buffer does not hold {}x{} {:?} pixels",
                bitmap.width, bitmap.height, bitmap.format
            ))
            .into());
        }

        let data = match bitmap.format {
            BitmapFormat::Rgba8 => bitmap.data,
            BitmapFormat::Rgb8 => bitmap
                .data
                .chunks_exact(3)
                .take(pixels)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
            BitmapFormat::Gray8 => bitmap
                .data
                .iter()
                .take(pixels)
                .flat_map(|&v| [v, v, v, 255])
                .collect(),
        };

        Ok(Self {
            bitmap: BitmapData {
                width: bitmap.width,
                height: bitmap.height,
                format: BitmapFormat::Rgba8,
                data,
            },
        })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    /// RGBA at `(x, y)`, None outside the canvas
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        let px = &self.bitmap.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn as_bitmap(&self) -> &BitmapData {
        &self.bitmap
    }

    pub fn into_bitmap(self) -> BitmapData {
        self.bitmap
    }

    /// Source-over blend of a coverage mask whose top-left pixel lands on `(x, y)`
    ///
    /// Parts of the mask outside the canvas are clipped.
    pub fn blend_mask(&mut self, mask: &GlyphMask, x: i32, y: i32, color: Color) {
        if mask.is_empty() || color.a == 0 {
            return;
        }

        let width = self.width() as i32;
        let height = self.height() as i32;
        let coverage = &mask.bitmap.data;

        for my in 0..mask.bitmap.height as i32 {
            let cy = y + my;
            if cy < 0 || cy >= height {
                continue;
            }
            for mx in 0..mask.bitmap.width as i32 {
                let cx = x + mx;
                if cx < 0 || cx >= width {
                    continue;
                }

                let cov = coverage[(my * mask.bitmap.width as i32 + mx) as usize] as u32;
                if cov == 0 {
                    continue;
                }

                let src_a = cov * color.a as u32 / 255;
                let inv_a = 255 - src_a;
                let idx = ((cy * width + cx) * 4) as usize;
                let dst = &mut self.bitmap.data[idx..idx + 4];

                dst[0] = ((color.r as u32 * src_a + dst[0] as u32 * inv_a + 127) / 255) as u8;
                dst[1] = ((color.g as u32 * src_a + dst[1] as u32 * inv_a + 127) / 255) as u8;
                dst[2] = ((color.b as u32 * src_a + dst[2] as u32 * inv_a + 127) / 255) as u8;
                dst[3] = (src_a + (dst[3] as u32 * inv_a + 127) / 255).min(255) as u8;
            }
        }
    }
}

/// How one field's text is drawn
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: SizedFont,
    pub color: Color,
    pub script: ScriptHint,
}

impl TextStyle {
    pub fn new(font: SizedFont, color: Color, script: ScriptHint) -> Self {
        Self {
            font,
            color,
            script,
        }
    }
}

/// Shapes, measures and draws text onto a [`Canvas`]
///
/// Holds no per-render state; one compositor serves any number of canvases
/// in parallel.
pub struct Compositor {
    shaper: TextShaper,
    measurer: TextMeasurer,
    renderer: Arc<dyn Renderer>,
    render_params: RenderParams,
}

impl Compositor {
    pub fn new(layout: Arc<dyn GlyphLayout>, renderer: Arc<dyn Renderer>) -> Self {
        Self {
            shaper: TextShaper::new(),
            measurer: TextMeasurer::new(layout),
            renderer,
            render_params: RenderParams::default(),
        }
    }

    pub fn with_render_params(mut self, params: RenderParams) -> Self {
        self.render_params = params;
        self
    }

    pub fn shaper(&self) -> &TextShaper {
        &self.shaper
    }

    pub fn measurer(&self) -> &TextMeasurer {
        &self.measurer
    }

    pub fn wrapper(&self) -> LineWrapper<'_> {
        LineWrapper::new(&self.shaper, &self.measurer)
    }

    /// Draw `text` with its ink box centred on `(x, y)`
    ///
    /// Returns the canvas-space box of the placed ink; text without ink
    /// draws nothing and returns an empty box at the anchor.
    pub fn draw_centered(
        &self,
        canvas: &mut Canvas,
        (x, y): (i32, i32),
        text: &LogicalText,
        style: &TextStyle,
    ) -> Result<TextBox> {
        let shaped = self.shaper.shape(text, style.script);
        self.draw_shaped_centered(canvas, (x, y), &shaped, style)
    }

    fn draw_shaped_centered(
        &self,
        canvas: &mut Canvas,
        (x, y): (i32, i32),
        shaped: &ShapedText,
        style: &TextStyle,
    ) -> Result<TextBox> {
        let run = self.measurer.layout(shaped, &style.font)?;
        let ink = ink_box(&run, style.font.font.as_ref());
        if ink.is_empty() {
            return Ok(TextBox::new(x as f32, y as f32, 0.0, 0.0));
        }

        let w = ink.width.round() as i32;
        let h = ink.height.round() as i32;
        let left = x - w.div_euclid(2);
        let top = y - h.div_euclid(2);

        // Pen origin that puts the ink's top-left corner on (left, top)
        let pen_x = left as f32 - ink.left;
        let pen_y = top as f32 - ink.top;
        let origin_x = pen_x.floor();
        let origin_y = pen_y.floor();

        let run = shift_run(run, pen_x - origin_x, pen_y - origin_y);
        let mask = self
            .renderer
            .render(&run, style.font.font.clone(), &self.render_params)?;
        canvas.blend_mask(
            &mask,
            origin_x as i32 + mask.left,
            origin_y as i32 + mask.top,
            style.color,
        );

        let placed = ink.translate(pen_x, pen_y);
        log::debug!(
            "drew {} glyphs centred on ({}, {}) at ({:.1}, {:.1}) {:.1}x{:.1}",
            run.glyphs.len(),
            x,
            y,
            placed.left,
            placed.top,
            placed.width,
            placed.height
        );
        Ok(placed)
    }

    /// Vertical distance between consecutive body lines
    ///
    /// The reference glyph is measured once so that every line gets the same
    /// pitch no matter how tall its own ink is.
    pub fn line_pitch(&self, reference: &LogicalText, style: &TextStyle, pad: i32) -> Result<i32> {
        let shaped = self.shaper.shape(reference, style.script);
        let reference_box = self.measurer.measure(&shaped, &style.font)?;
        if reference_box.is_empty() {
            log::warn!("reference glyph {:?} has no ink; pitch is the pad alone", reference.as_str());
        }
        Ok(reference_box.height.round() as i32 + pad)
    }

    /// Draw wrapped lines top to bottom, each centred on the region's midpoint
    ///
    /// Returns the vertical centre used for every line.
    pub fn draw_paragraph(
        &self,
        canvas: &mut Canvas,
        region: &BodyRegion,
        lines: &[LogicalText],
        style: &TextStyle,
        reference: &LogicalText,
    ) -> Result<Vec<i32>> {
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let pitch = self.line_pitch(reference, style, region.line_spacing_pad)?;
        let center_x = region.center_x();
        let mut centers = Vec::with_capacity(lines.len());
        let mut y = region.start_y;

        for line in lines {
            let shaped = self.shaper.shape(line, style.script);
            self.draw_shaped_centered(canvas, (center_x, y), &shaped, style)?;
            centers.push(y);
            y += pitch;
        }

        log::debug!(
            "drew {} body lines from y={} with pitch {}",
            lines.len(),
            region.start_y,
            pitch
        );
        Ok(centers)
    }
}

/// Move every glyph by a sub-pixel offset given in y-down pixels
fn shift_run(mut run: GlyphRun, dx: f32, dy: f32) -> GlyphRun {
    if dx == 0.0 && dy == 0.0 {
        return run;
    }
    for glyph in &mut run.glyphs {
        glyph.x += dx;
        glyph.y -= dy;
    }
    run
}
