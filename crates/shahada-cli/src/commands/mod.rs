//! Command implementations

pub mod batch;
pub mod interactive;
pub mod render;

use std::sync::Arc;

use shahada::{fontdb::FontDatabase, traits::FontRef, CertificateLayout, Template};

use crate::cli::ResourceArgs;
use crate::error::Result;

/// Template, font and layout loaded once and shared by every render
pub struct Resources {
    pub template: Template,
    pub font: Arc<dyn FontRef>,
    pub layout: CertificateLayout,
}

/// Load everything a render needs and check the layout fits the template
///
/// The font goes through `fonts`, so later lookups of the same file share it.
pub fn load_resources(args: &ResourceArgs, fonts: &FontDatabase) -> Result<Resources> {
    let template = Template::from_file(&args.template)?;
    let font: Arc<dyn FontRef> = fonts.load_font_index(&args.font, args.face_index)?;
    let layout = match &args.layout {
        Some(path) => CertificateLayout::from_file(path)?,
        None => CertificateLayout::default(),
    };
    layout.validate(template.width(), template.height())?;

    log::debug!(
        "loaded {}x{} template {} and font {}",
        template.width(),
        template.height(),
        args.template.display(),
        args.font.display()
    );

    Ok(Resources {
        template,
        font,
        layout,
    })
}
