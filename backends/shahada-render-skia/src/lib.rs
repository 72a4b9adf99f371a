//! Skia Renderer - glyph coverage via tiny-skia
//!
//! A whole run is traced into one kurbo path, filled once with tiny-skia and
//! handed back as a Gray8 coverage mask. Colour and placement on the canvas
//! are the compositor's business; this crate only answers "how much ink
//! lands on each pixel".
//!
//! The mask is aligned to whole pixels relative to the pen origin, so a
//! compositor that puts the origin on an integer pixel reproduces exactly
//! the coverage computed here.

use std::sync::Arc;

use kurbo::{BezPath, PathEl, Shape};
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    MetadataProvider,
};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use shahada_core::{
    error::{RenderError, Result},
    traits::{FontRef, Renderer},
    types::{BitmapData, BitmapFormat, GlyphMask, GlyphRun},
    RenderParams,
};

/// tiny-skia powered renderer
pub struct SkiaRenderer {
    /// Maximum mask dimension to prevent memory exhaustion
    max_size: u32,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { max_size: 65535 }
    }

    /// Trace every glyph of the run into one y-up path, in pixels from the pen origin
    fn trace_run(&self, run: &GlyphRun, font: &Arc<dyn FontRef>) -> Result<BezPath> {
        let font_ref = skrifa::FontRef::new(font.data()).map_err(|_| RenderError::InvalidFont)?;
        let outlines = font_ref.outline_glyphs();
        let settings = || DrawSettings::unhinted(Size::new(run.size), LocationRef::default());

        let mut path = BezPath::new();
        for glyph in &run.glyphs {
            // Glyphs without an outline (space, .notdef in some fonts) add no ink
            let Some(outline) = outlines.get(skrifa::GlyphId::new(glyph.id)) else {
                log::trace!("Skia: glyph {} has no outline", glyph.id);
                continue;
            };

            let mut pen = PathPen {
                path: &mut path,
                dx: glyph.x as f64,
                dy: glyph.y as f64,
            };
            outline
                .draw(settings(), &mut pen)
                .map_err(|_| RenderError::OutlineExtractionFailed(glyph.id))?;
        }

        Ok(path)
    }

    /// Fill a y-up path into an alpha pixmap and return it as a mask
    fn rasterize(&self, path: &BezPath, params: &RenderParams) -> Result<GlyphMask> {
        let bbox = path.bounding_box();
        if !(bbox.x0.is_finite() && bbox.y0.is_finite() && bbox.x1.is_finite() && bbox.y1.is_finite())
        {
            return Err(RenderError::PathBuildingFailed.into());
        }
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(GlyphMask::empty());
        }

        // Snap the mask to whole pixels around the ink
        let left = bbox.x0.floor() as i32;
        let right = bbox.x1.ceil() as i32;
        let ascent = bbox.y1.ceil() as i32;
        let descent = bbox.y0.floor() as i32;

        let width = (right - left).max(1) as u32;
        let height = (ascent - descent).max(1) as u32;
        if width > self.max_size || height > self.max_size {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        log::debug!(
            "Skia: bbox=({:.1}, {:.1}, {:.1}, {:.1}), mask {}x{}",
            bbox.x0,
            bbox.y0,
            bbox.x1,
            bbox.y1,
            width,
            height
        );

        let skia_path = to_skia_path(path)?;
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapCreationFailed)?;

        let paint = Paint {
            anti_alias: params.antialias,
            ..Default::default()
        };

        // Fonts are y-up and bitmaps y-down: flip, then shift the ink into the pixmap
        let transform =
            Transform::from_scale(1.0, -1.0).post_translate(-left as f32, ascent as f32);
        pixmap.fill_path(&skia_path, &paint, FillRule::Winding, transform, None);

        // Default paint is opaque black, so alpha alone carries the coverage
        let alpha: Vec<u8> = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();

        Ok(GlyphMask {
            bitmap: BitmapData {
                width,
                height,
                format: BitmapFormat::Gray8,
                data: alpha,
            },
            left,
            top: -ascent,
        })
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SkiaRenderer {
    fn name(&self) -> &'static str {
        "skia"
    }

    fn render(
        &self,
        run: &GlyphRun,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<GlyphMask> {
        if run.glyphs.is_empty() {
            return Ok(GlyphMask::empty());
        }

        let path = self.trace_run(run, &font)?;
        if path.elements().is_empty() {
            return Ok(GlyphMask::empty());
        }

        self.rasterize(&path, params)
    }
}

/// Translate kurbo's path format into tiny-skia's
fn to_skia_path(path: &BezPath) -> Result<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(ctrl, end) => {
                builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
            },
            PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                end.x as f32,
                end.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }

    Ok(builder.finish().ok_or(RenderError::PathBuildingFailed)?)
}

/// Bridge between skrifa's outline commands and kurbo's path format
///
/// skrifa already scales to pixels; the pen only shifts each point to where
/// the glyph sits in the run.
struct PathPen<'a> {
    path: &'a mut BezPath,
    dx: f64,
    dy: f64,
}

impl PathPen<'_> {
    fn point(&self, x: f32, y: f32) -> (f64, f64) {
        (x as f64 + self.dx, y as f64 + self.dy)
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.point(cx0, cy0);
        let p = self.point(x, y);
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c0 = self.point(cx0, cy0);
        let c1 = self.point(cx1, cy1);
        let p = self.point(x, y);
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
