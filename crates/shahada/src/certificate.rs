//! The certificate renderer: template plus four fields in, PNG bytes out
//!
//! One render is strictly sequential:
//!
//! 1. validate the layout against the template
//! 2. copy the template into a fresh canvas
//! 3. draw title, name and role centred on their anchors
//! 4. wrap the body and draw its lines top to bottom
//! 5. encode the canvas
//!
//! Any failure aborts the whole render. The renderer keeps no per-render
//! state, so a single instance can serve renders on many threads at once.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shahada_core::{
    error::{ResourceError, Result},
    traits::{Exporter, FontRef, GlyphLayout, Renderer},
    types::BitmapData,
    LogicalText, RenderParams,
};
use shahada_export::{decode_template, PngExporter};
use shahada_layout_hr::HarfrustLayout;
use shahada_render_skia::SkiaRenderer;

use crate::compositor::{Canvas, Compositor, TextStyle};
use crate::config::CertificateLayout;
use crate::metrics::SizedFont;

/// A decoded background image, reused across renders
#[derive(Debug, Clone)]
pub struct Template {
    bitmap: BitmapData,
}

impl Template {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ResourceError::TemplateNotFound(path.display().to_string()),
            _ => ResourceError::TemplateUnreadable {
                path: path.display().to_string(),
                reason: err.to_string(),
            },
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            bitmap: decode_template(bytes)?,
        })
    }

    /// Use already-decoded pixels as the template
    pub fn from_bitmap(bitmap: BitmapData) -> Result<Self> {
        // Normalise to RGBA once instead of on every render
        let bitmap = Canvas::from_bitmap(bitmap)?.into_bitmap();
        Ok(Self { bitmap })
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }

    pub fn canvas(&self) -> Result<Canvas> {
        Canvas::from_bitmap(self.bitmap.clone())
    }
}

/// The four texts a certificate carries, in reading order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateFields {
    pub title: LogicalText,
    pub name: LogicalText,
    pub role: LogicalText,
    #[serde(default)]
    pub body: LogicalText,
}

impl CertificateFields {
    pub fn new(
        title: impl Into<LogicalText>,
        name: impl Into<LogicalText>,
        role: impl Into<LogicalText>,
        body: impl Into<LogicalText>,
    ) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            role: role.into(),
            body: body.into(),
        }
    }
}

/// Renders certificates from a template, a layout and one font family
///
/// ```ignore
/// let renderer = CertificateRenderer::builder().build();
/// let png = renderer.render(&template, &fields, &CertificateLayout::default(), font)?;
/// ```
pub struct CertificateRenderer {
    compositor: Compositor,
    exporter: Arc<dyn Exporter>,
}

impl CertificateRenderer {
    pub fn builder() -> CertificateRendererBuilder {
        CertificateRendererBuilder::new()
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Draw every field onto a fresh copy of the template
    pub fn compose(
        &self,
        template: &Template,
        fields: &CertificateFields,
        layout: &CertificateLayout,
        font: Arc<dyn FontRef>,
    ) -> Result<Canvas> {
        layout.validate(template.width(), template.height())?;
        let mut canvas = template.canvas()?;

        for ((field, anchor), text) in layout
            .anchors()
            .into_iter()
            .zip([&fields.title, &fields.name, &fields.role])
        {
            let style = TextStyle::new(
                SizedFont::new(font.clone(), anchor.size),
                anchor.color,
                layout.script,
            );
            let placed =
                self.compositor
                    .draw_centered(&mut canvas, (anchor.x, anchor.y), text, &style)?;
            log::debug!("{} placed at {:?}", field, placed);
        }

        let body = &layout.body;
        let body_style = TextStyle::new(SizedFont::new(font, body.size), body.color, layout.script);
        let lines = self.compositor.wrapper().wrap(
            &fields.body,
            &body_style.font,
            layout.script,
            body.width(),
        )?;
        self.compositor.draw_paragraph(
            &mut canvas,
            body,
            &lines,
            &body_style,
            &LogicalText::new(layout.reference_glyph.as_str()),
        )?;

        Ok(canvas)
    }

    /// Render a certificate and return the encoded image
    pub fn render(
        &self,
        template: &Template,
        fields: &CertificateFields,
        layout: &CertificateLayout,
        font: Arc<dyn FontRef>,
    ) -> Result<Vec<u8>> {
        let canvas = self.compose(template, fields, layout, font)?;
        let bytes = self.exporter.export(canvas.as_bitmap())?;
        log::info!(
            "rendered {}x{} certificate ({} bytes)",
            canvas.width(),
            canvas.height(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// File extension of the encoded output
    pub fn extension(&self) -> &'static str {
        self.exporter.extension()
    }
}

/// Choose the backends a [`CertificateRenderer`] uses
///
/// Anything left unset falls back to harfrust layout, the tiny-skia
/// rasterizer and PNG export.
#[derive(Default)]
pub struct CertificateRendererBuilder {
    layout: Option<Arc<dyn GlyphLayout>>,
    renderer: Option<Arc<dyn Renderer>>,
    exporter: Option<Arc<dyn Exporter>>,
    render_params: Option<RenderParams>,
}

impl CertificateRendererBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose who turns visual text into positioned glyphs
    pub fn layout(mut self, layout: Arc<dyn GlyphLayout>) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Choose who turns glyphs into coverage
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Choose how the finished canvas is encoded
    pub fn exporter(mut self, exporter: Arc<dyn Exporter>) -> Self {
        self.exporter = Some(exporter);
        self
    }

    pub fn render_params(mut self, params: RenderParams) -> Self {
        self.render_params = Some(params);
        self
    }

    pub fn build(self) -> CertificateRenderer {
        let layout = self
            .layout
            .unwrap_or_else(|| Arc::new(HarfrustLayout::new()));
        let renderer = self
            .renderer
            .unwrap_or_else(|| Arc::new(SkiaRenderer::new()));
        let exporter = self
            .exporter
            .unwrap_or_else(|| Arc::new(PngExporter::new()));

        log::debug!(
            "certificate renderer: layout={}, renderer={}, exporter={}",
            layout.name(),
            renderer.name(),
            exporter.name()
        );

        CertificateRenderer {
            compositor: Compositor::new(layout, renderer)
                .with_render_params(self.render_params.unwrap_or_default()),
            exporter,
        }
    }
}
