//! End-to-end certificate renders
//!
//! Mock-font tests always run. Tests that need real outlines look for an
//! Arabic-capable font and skip when none is installed.

use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;
use shahada::{
    fontdb::Font,
    traits::{FontRef, Renderer},
    types::{BitmapData, BitmapFormat, GlyphBounds, GlyphMask, GlyphRun},
    CertificateFields, CertificateLayout, CertificateRenderer, Color, LogicalText,
    RenderParams, Result, ScriptHint, SizedFont, Template, TextStyle,
};
use shahada_export::encode_bitmap_to_png;
use shahada_layout_none::NoneLayout;

/// Every character is a 500-unit glyph with a 400x700 block of ink
struct StubFont;

impl FontRef for StubFont {
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
        if char::from_u32(glyph_id)?.is_whitespace() {
            return None;
        }
        Some(GlyphBounds {
            x_min: 50.0,
            y_min: 0.0,
            x_max: 450.0,
            y_max: 700.0,
        })
    }
}

/// Paints one opaque pixel-aligned block per run
struct StubRenderer;

impl Renderer for StubRenderer {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn render(
        &self,
        run: &GlyphRun,
        font: Arc<dyn FontRef>,
        _params: &RenderParams,
    ) -> Result<GlyphMask> {
        let ink = shahada::ink_box(run, font.as_ref());
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

fn stub_renderer() -> CertificateRenderer {
    CertificateRenderer::builder()
        .layout(Arc::new(NoneLayout::new()))
        .renderer(Arc::new(StubRenderer))
        .build()
}

/// A plain cream template encoded the way a real one would arrive
fn template(width: u32, height: u32) -> Template {
    let bitmap = BitmapData {
        width,
        height,
        format: BitmapFormat::Rgb8,
        data: [250u8, 245, 230].repeat((width * height) as usize),
    };
    Template::from_bytes(&encode_bitmap_to_png(&bitmap).unwrap()).unwrap()
}

fn arabic_font_path() -> Option<PathBuf> {
    let repo = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fonts");
    [
        repo.join("NotoKufiArabic-Bold.ttf"),
        repo.join("NotoNaskhArabic-Regular.ttf"),
        PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
        PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
        PathBuf::from("/usr/share/fonts/dejavu/DejaVuSans.ttf"),
    ]
    .into_iter()
    .find(|path| path.exists())
}

fn forty_word_body() -> String {
    let words = [
        "تشهد", "إدارة", "المؤسسة", "بأن", "المتطوع", "قد", "أتم", "بنجاح", "جميع", "المهام",
    ];
    words
        .iter()
        .cycle()
        .take(40)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn sample_fields() -> CertificateFields {
    CertificateFields::new(
        "شهادة تقدير",
        "محمد أحمد",
        "منسق البرنامج 2024",
        forty_word_body(),
    )
}

fn decoded_size(png: &[u8]) -> (u32, u32) {
    let decoded = Template::from_bytes(png).unwrap();
    (decoded.width(), decoded.height())
}

#[test]
fn test_stub_render_is_deterministic() {
    let renderer = stub_renderer();
    let template = template(1300, 1200);
    let layout = CertificateLayout::default();
    let font: Arc<dyn FontRef> = Arc::new(StubFont);

    let first = renderer
        .render(&template, &sample_fields(), &layout, font.clone())
        .unwrap();
    let second = renderer
        .render(&template, &sample_fields(), &layout, font)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(decoded_size(&first), (1300, 1200));
}

#[test]
fn test_parallel_renders_match_sequential() {
    let renderer = stub_renderer();
    let template = template(1300, 1200);
    let layout = CertificateLayout::default();
    let font: Arc<dyn FontRef> = Arc::new(StubFont);

    let expected = renderer
        .render(&template, &sample_fields(), &layout, font.clone())
        .unwrap();

    let outputs: Vec<Vec<u8>> = (0..8)
        .into_par_iter()
        .map(|_| {
            renderer
                .render(&template, &sample_fields(), &layout, font.clone())
                .unwrap()
        })
        .collect();

    assert!(outputs.iter().all(|png| *png == expected));
}

#[test]
fn test_whitespace_body_leaves_body_region_alone() {
    let renderer = stub_renderer();
    let template = template(1300, 1200);
    let layout = CertificateLayout::default();
    let fields = CertificateFields::new("a", "b", "c", " \t\n ");

    let canvas = renderer
        .compose(&template, &fields, &layout, Arc::new(StubFont))
        .unwrap();
    let blank = template.canvas().unwrap();

    // Everything below the role line belongs to the body
    for y in 640..1200 {
        for x in 0..1300 {
            assert_eq!(canvas.pixel(x, y), blank.pixel(x, y), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_missing_template_and_font_are_resource_errors() {
    assert!(Template::from_file("/nowhere/certificate_template.png")
        .unwrap_err()
        .is_resource());
    assert!(Font::from_file("/nowhere/NotoKufiArabic-Bold.ttf")
        .err()
        .unwrap()
        .is_resource());
}

#[test]
fn test_real_font_forty_word_scenario() {
    let Some(path) = arabic_font_path() else {
        eprintln!("Skipping test: no Arabic font found");
        return;
    };
    let font: Arc<dyn FontRef> = Arc::new(Font::from_file(path).unwrap());
    let renderer = CertificateRenderer::builder().build();
    let compositor = renderer.compositor();

    let mut layout = CertificateLayout::default();
    layout.body.line_spacing_pad = 20;
    let body = &layout.body;
    assert_eq!(body.width(), 1213);

    let style = TextStyle::new(
        SizedFont::new(font.clone(), body.size),
        body.color,
        ScriptHint::Auto,
    );
    let paragraph = LogicalText::new(forty_word_body());

    let lines = compositor
        .wrapper()
        .wrap(&paragraph, &style.font, ScriptHint::Auto, body.width())
        .unwrap();
    assert!(!lines.is_empty());

    let again = compositor
        .wrapper()
        .wrap(&paragraph, &style.font, ScriptHint::Auto, body.width())
        .unwrap();
    assert_eq!(lines, again);

    for line in &lines {
        let width = compositor
            .wrapper()
            .line_width(line, &style.font, ScriptHint::Auto)
            .unwrap();
        assert!(width <= 1213.0, "line {:?} is {}px wide", line.as_str(), width);
    }
    let words: Vec<&str> = lines.iter().flat_map(|line| line.words()).collect();
    assert_eq!(words, paragraph.words().collect::<Vec<_>>());

    let reference = LogicalText::new(layout.reference_glyph.as_str());
    let pitch = compositor.line_pitch(&reference, &style, 20).unwrap();
    let reference_height = compositor
        .measurer()
        .measure(&compositor.shaper().shape(&reference, ScriptHint::Auto), &style.font)
        .unwrap()
        .height;
    assert_eq!(pitch, reference_height.round() as i32 + 20);

    let template = template(1300, 1200);
    let mut canvas = template.canvas().unwrap();
    let centers = compositor
        .draw_paragraph(&mut canvas, body, &lines, &style, &reference)
        .unwrap();
    assert_eq!(centers.len(), lines.len());
    assert_eq!(centers[0], 665);
    assert!(centers.windows(2).all(|pair| pair[1] - pair[0] == pitch));

    let png = renderer
        .render(&template, &sample_fields(), &layout, font.clone())
        .unwrap();
    assert_eq!(decoded_size(&png), (1300, 1200));
    let repeat = renderer
        .render(&template, &sample_fields(), &layout, font)
        .unwrap();
    assert_eq!(png, repeat);
}

#[test]
fn test_real_font_fields_are_centred_on_anchors() {
    let Some(path) = arabic_font_path() else {
        eprintln!("Skipping test: no Arabic font found");
        return;
    };
    let font: Arc<dyn FontRef> = Arc::new(Font::from_file(path).unwrap());
    let renderer = CertificateRenderer::builder().build();
    let template = template(1300, 1200);
    let mut canvas = template.canvas().unwrap();

    for (text, anchor, size) in [
        ("شهادة تقدير", (651, 470), 40.0),
        ("محمد أحمد", (650, 545), 40.0),
        ("عام 2024", (652, 615), 30.0),
    ] {
        let style = TextStyle::new(
            SizedFont::new(font.clone(), size),
            Color::black(),
            ScriptHint::Auto,
        );
        let placed = renderer
            .compositor()
            .draw_centered(&mut canvas, anchor, &LogicalText::from(text), &style)
            .unwrap();

        assert!(!placed.is_empty());
        let (cx, cy) = placed.center();
        assert!((cx - anchor.0 as f32).abs() <= 1.0, "{text}: x centre {cx}");
        assert!((cy - anchor.1 as f32).abs() <= 1.0, "{text}: y centre {cy}");
    }

    assert_ne!(canvas, template.canvas().unwrap());
}
