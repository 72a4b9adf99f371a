//! Where every field of a template goes
//!
//! A [`CertificateLayout`] is an immutable value handed to each render. The
//! stock values reproduce the original certificate template; other templates
//! load their own from JSON:
//!
//! ```json
//! {
//!   "title": { "x": 651, "y": 470, "size": 40, "color": "black" },
//!   "name":  { "x": 650, "y": 545, "size": 40, "color": "white" },
//!   "role":  { "x": 652, "y": 615, "size": 30, "color": "green" },
//!   "body":  { "left": 28, "right": 1241, "start_y": 665,
//!              "line_spacing_pad": 2, "size": 40, "color": "black" },
//!   "script": "auto",
//!   "reference_glyph": "أ"
//! }
//! ```
//!
//! Missing top-level keys fall back to the stock values.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shahada_core::{
    error::{ConfigError, Result},
    Color, ScriptHint,
};

/// One fixed field centred on a canvas point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnchor {
    pub x: i32,
    pub y: i32,
    /// Pixels per em
    pub size: f32,
    #[serde(with = "color_serde")]
    pub color: Color,
}

impl FieldAnchor {
    pub fn new(x: i32, y: i32, size: f32, color: Color) -> Self {
        Self { x, y, size, color }
    }
}

/// The horizontal band the body paragraph wraps inside
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRegion {
    pub left: i32,
    pub right: i32,
    /// Vertical centre of the first body line
    pub start_y: i32,
    /// Extra pixels between consecutive lines, on top of the reference glyph height
    pub line_spacing_pad: i32,
    pub size: f32,
    #[serde(with = "color_serde")]
    pub color: Color,
}

impl BodyRegion {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Horizontal centre every body line is drawn around
    pub fn center_x(&self) -> i32 {
        (self.left + self.right).div_euclid(2)
    }
}

/// Anchors, body region and text options for one template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateLayout {
    pub title: FieldAnchor,
    pub name: FieldAnchor,
    pub role: FieldAnchor,
    pub body: BodyRegion,
    /// Paragraph direction applied to every field
    pub script: ScriptHint,
    /// Character whose height sets the body line pitch
    pub reference_glyph: String,
}

impl Default for CertificateLayout {
    fn default() -> Self {
        Self {
            title: FieldAnchor::new(651, 470, 40.0, Color::black()),
            name: FieldAnchor::new(650, 545, 40.0, Color::white()),
            role: FieldAnchor::new(652, 615, 30.0, Color::rgb(0, 128, 0)),
            body: BodyRegion {
                left: 28,
                right: 1241,
                start_y: 665,
                line_spacing_pad: 2,
                size: 40.0,
                color: Color::black(),
            },
            script: ScriptHint::Auto,
            reference_glyph: "\u{0623}".to_string(),
        }
    }
}

impl CertificateLayout {
    pub fn from_json(json: &str) -> Result<Self> {
        let layout = serde_json::from_str(json)
            .map_err(|e| ConfigError::Invalid(format!("layout JSON: {e}")))?;
        Ok(layout)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ConfigError::Invalid(format!("cannot read layout {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Invalid(format!("layout JSON: {e}")).into())
    }

    /// The fixed fields in drawing order
    pub fn anchors(&self) -> [(&'static str, &FieldAnchor); 3] {
        [
            ("title", &self.title),
            ("name", &self.name),
            ("role", &self.role),
        ]
    }

    /// Check the layout against a canvas before anything is drawn
    pub fn validate(&self, canvas_width: u32, canvas_height: u32) -> Result<()> {
        let inside = |x: i32, y: i32| {
            x >= 0 && y >= 0 && (x as i64) < canvas_width as i64 && (y as i64) < canvas_height as i64
        };
        let out_of_bounds = |field: &str, x: i32, y: i32| ConfigError::AnchorOutOfBounds {
            field: field.to_string(),
            x,
            y,
            width: canvas_width,
            height: canvas_height,
        };

        for (field, anchor) in self.anchors() {
            check_size(field, anchor.size)?;
            if !inside(anchor.x, anchor.y) {
                return Err(out_of_bounds(field, anchor.x, anchor.y).into());
            }
        }

        let body = &self.body;
        check_size("body", body.size)?;
        if body.width() <= 0 {
            return Err(ConfigError::NonPositiveWidth {
                region: "body".to_string(),
                width: body.width(),
            }
            .into());
        }
        if body.left < 0 || body.right as i64 > canvas_width as i64 {
            let x = if body.left < 0 { body.left } else { body.right };
            return Err(out_of_bounds("body", x, body.start_y).into());
        }
        if !inside(body.center_x(), body.start_y) {
            return Err(out_of_bounds("body", body.center_x(), body.start_y).into());
        }

        if self.reference_glyph.trim().is_empty() {
            return Err(ConfigError::Invalid("reference_glyph must not be empty".into()).into());
        }

        Ok(())
    }
}

fn check_size(field: &str, size: f32) -> std::result::Result<(), ConfigError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveFontSize {
            field: field.to_string(),
            size,
        })
    }
}

/// Colors are written as names or `#RRGGBB[AA]` in layout files
mod color_serde {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use shahada_core::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}
