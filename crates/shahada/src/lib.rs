//! shahada - Arabic-aware certificate rendering
//!
//! Four logical text fields and a template image go in; a PNG comes out.
//! Between the two:
//!
//! 1. **Shaping** - [`TextShaper`] joins Arabic letters and reorders runs
//! 2. **Measuring** - [`TextMeasurer`] lays shaped text out and unions outline bounds
//! 3. **Wrapping** - [`LineWrapper`] breaks the body greedily on shaped widths
//! 4. **Compositing** - [`Compositor`] centres every line on its anchor
//! 5. **Rendering** - [`CertificateRenderer`] runs the sequence and encodes the canvas
//!
//! ```ignore
//! use std::sync::Arc;
//! use shahada::{fontdb::Font, CertificateFields, CertificateLayout, CertificateRenderer, Template};
//!
//! let template = Template::from_file("certificate_template.png")?;
//! let font = Arc::new(Font::from_file("NotoKufiArabic-Bold.ttf")?);
//! let fields = CertificateFields::new("شهادة تقدير", "فلان الفلاني", "متطوع", "نص الشهادة");
//!
//! let png = CertificateRenderer::builder()
//!     .build()
//!     .render(&template, &fields, &CertificateLayout::default(), font)?;
//! ```

pub mod certificate;
pub mod compositor;
pub mod config;
pub mod metrics;
pub mod wrap;

#[cfg(test)]
mod testing;

pub use certificate::{CertificateFields, CertificateRenderer, CertificateRendererBuilder, Template};
pub use compositor::{Canvas, Compositor, TextStyle};
pub use config::{BodyRegion, CertificateLayout, FieldAnchor};
pub use metrics::{ink_box, SizedFont, TextMeasurer};
pub use wrap::LineWrapper;

pub use shahada_core::{
    error, traits, types, Color, LogicalText, RenderParams, Result, ScriptHint, ShahadaError,
    ShapedText, ShapingParams, TextShaper,
};
pub use shahada_fontdb as fontdb;
