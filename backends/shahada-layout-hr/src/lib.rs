//! OpenType glyph layout using harfrust
//!
//! The visual string handed to us is already joined and ordered, so harfrust
//! runs left to right and contributes what a cmap walk cannot: kerning,
//! mark attachment and whatever GPOS the font carries with its default
//! features.
//!
//! When the font bytes are missing or unparseable, layout degrades to plain
//! advance widths instead of failing the render.

use std::sync::Arc;

use harfrust::{Direction as HrDirection, FontRef as HrFontRef, GlyphBuffer, ShaperData, UnicodeBuffer};

use shahada_core::{
    error::{Result, ShapingError},
    traits::{FontRef, GlyphLayout},
    types::{GlyphRun, PositionedGlyph},
    ShapedText, ShapingParams,
};
use shahada_layout_none::advance_layout;

/// Glyph layout powered by harfrust
pub struct HarfrustLayout;

impl HarfrustLayout {
    pub fn new() -> Self {
        Self
    }

    /// Extract positioned glyphs from harfrust's GlyphBuffer
    fn extract_glyphs(buffer: &GlyphBuffer, size: f32, upem: u16) -> (Vec<PositionedGlyph>, f32) {
        let mut glyphs = Vec::new();
        let mut x_offset = 0.0;
        let scale = size / upem.max(1) as f32;

        let positions = buffer.glyph_positions();
        let infos = buffer.glyph_infos();

        for (info, pos) in infos.iter().zip(positions.iter()) {
            glyphs.push(PositionedGlyph {
                id: info.glyph_id,
                x: x_offset + (pos.x_offset as f32 * scale),
                y: pos.y_offset as f32 * scale,
                cluster: info.cluster,
            });

            x_offset += pos.x_advance as f32 * scale;
        }

        (glyphs, x_offset)
    }
}

impl Default for HarfrustLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphLayout for HarfrustLayout {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn layout(
        &self,
        text: &ShapedText,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<GlyphRun> {
        if !params.size.is_finite() || params.size <= 0.0 {
            return Err(ShapingError::BackendError(format!(
                "harfrust cannot lay out at size {}",
                params.size
            ))
            .into());
        }
        if text.is_empty() {
            return Ok(GlyphRun::empty(params.size));
        }

        let font_data = font.data();
        if font_data.is_empty() {
            return Ok(advance_layout(text.as_str(), font.as_ref(), params.size));
        }

        let hr_font = match HrFontRef::new(font_data) {
            Ok(f) => f,
            Err(err) => {
                log::warn!(
                    "harfrust cannot parse font ({:?}); falling back to advance layout",
                    err
                );
                return Ok(advance_layout(text.as_str(), font.as_ref(), params.size));
            },
        };

        // ShaperData caches font tables; it is rebuilt per call so the layout stays stateless
        let shaper_data = ShaperData::new(&hr_font);
        let shaper = shaper_data
            .shaper(&hr_font)
            .point_size(Some(params.size))
            .build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text.as_str());
        // Visual order: the bidi pass already reversed right-to-left runs
        buffer.set_direction(HrDirection::LeftToRight);

        let output = shaper.shape(buffer, &[]);

        let (glyphs, advance_width) =
            Self::extract_glyphs(&output, params.size, font.units_per_em());
        log::trace!(
            "harfrust laid out {} glyphs, {:.1}px wide",
            glyphs.len(),
            advance_width
        );

        Ok(GlyphRun {
            glyphs,
            advance_width,
            size: params.size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shahada_core::{LogicalText, ScriptHint, TextShaper};
    use std::path::PathBuf;

    struct TestFont {
        data: Vec<u8>,
    }

    impl FontRef for TestFont {
        fn data(&self) -> &[u8] {
            &self.data
        }

        fn units_per_em(&self) -> u16 {
            1000
        }

        fn glyph_id(&self, ch: char) -> Option<u32> {
            Some(ch as u32)
        }

        fn advance_width(&self, _: u32) -> f32 {
            500.0
        }
    }

    fn visual(text: &str) -> ShapedText {
        TextShaper::new().shape(&LogicalText::from(text), ScriptHint::Auto)
    }

    fn arabic_font_path() -> Option<PathBuf> {
        let repo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fonts");
        [
            repo.join("NotoKufiArabic-Bold.ttf"),
            repo.join("NotoNaskhArabic-Regular.ttf"),
            PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    #[test]
    fn test_empty_text() {
        let layout = HarfrustLayout::new();
        let font = Arc::new(TestFont { data: vec![] });

        let run = layout
            .layout(&visual(""), font, &ShapingParams::default())
            .unwrap();
        assert!(run.glyphs.is_empty());
        assert_eq!(run.advance_width, 0.0);
    }

    #[test]
    fn test_no_font_data_falls_back_to_advances() {
        let layout = HarfrustLayout::new();
        let font = Arc::new(TestFont { data: vec![] });

        let run = layout
            .layout(&visual("Hi"), font, &ShapingParams::sized(20.0))
            .unwrap();
        assert_eq!(run.glyphs.len(), 2);
        assert_eq!(run.advance_width, 20.0);
        assert_eq!(run.size, 20.0);
    }

    #[test]
    fn test_garbage_font_data_falls_back_to_advances() {
        let layout = HarfrustLayout::new();
        let font = Arc::new(TestFont {
            data: vec![0xde, 0xad, 0xbe, 0xef],
        });

        let run = layout
            .layout(&visual("abc"), font, &ShapingParams::default())
            .unwrap();
        assert_eq!(run.glyphs.len(), 3);
    }

    #[test]
    fn test_unusable_size_is_shaping_error() {
        let layout = HarfrustLayout::new();
        let font: Arc<dyn FontRef> = Arc::new(TestFont { data: vec![] });

        for size in [0.0, -4.0, f32::NAN] {
            let err = layout
                .layout(&visual("Hi"), font.clone(), &ShapingParams::sized(size))
                .unwrap_err();
            assert!(matches!(err, shahada_core::ShahadaError::Shaping(_)));
        }
    }

    #[test]
    fn test_real_font_lays_out_arabic_left_to_right() {
        let Some(path) = arabic_font_path() else {
            eprintln!("Skipping test: no Arabic font found");
            return;
        };
        let font: Arc<dyn FontRef> = Arc::new(shahada_fontdb::Font::from_file(path).unwrap());

        let run = HarfrustLayout::new()
            .layout(&visual("شهادة تقدير"), font, &ShapingParams::sized(40.0))
            .unwrap();

        assert!(!run.glyphs.is_empty());
        assert!(run.advance_width > 0.0);
        for pair in run.glyphs.windows(2) {
            assert!(pair[1].cluster >= pair[0].cluster, "clusters must stay in visual order");
        }
    }
}
