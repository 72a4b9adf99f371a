//! Render command implementation

use std::fs;

use shahada::{fontdb::FontDatabase, CertificateFields, CertificateRenderer};

use super::load_resources;
use crate::cli::RenderArgs;
use crate::error::Result;

pub fn run(args: &RenderArgs) -> Result<()> {
    let resources = load_resources(&args.resources, &FontDatabase::new())?;

    let body = match (&args.body, &args.body_file) {
        (Some(body), _) => body.clone(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => String::new(),
    };
    let fields = CertificateFields::new(
        args.title.as_str(),
        args.name.as_str(),
        args.role.as_str(),
        body,
    );

    let renderer = CertificateRenderer::builder().build();
    let bytes = renderer.render(
        &resources.template,
        &fields,
        &resources.layout,
        resources.font,
    )?;
    fs::write(&args.output, &bytes)?;

    if !args.quiet {
        eprintln!("✓ Certificate written to {}", args.output.display());
        eprintln!(
            "  Size: {}×{} pixels, {} bytes",
            resources.template.width(),
            resources.template.height(),
            bytes.len()
        );
    }

    Ok(())
}
