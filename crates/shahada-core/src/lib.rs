//! Shahada Core: the shared vocabulary of the certificate renderer
//!
//! Strings flow strictly downward through the stack:
//!
//! 1. **Shaping** - logical text becomes visual text ([`shahada_unicode`])
//! 2. **Layout** - visual text becomes positioned glyphs ([`GlyphLayout`])
//! 3. **Measuring** - glyph outlines give the ink box ([`types::TextBox`])
//! 4. **Rendering** - glyphs become coverage masks ([`Renderer`])
//! 5. **Export** - the finished canvas becomes PNG bytes ([`Exporter`])
//!
//! This crate holds the types passed between those steps, the traits the
//! backends implement and the error taxonomy every step reports through.

pub mod error;
pub mod traits;

pub use error::{Result, ShahadaError};
pub use shahada_unicode::{LogicalText, ScriptHint, ShapedText, TextShaper};
pub use traits::{Exporter, FontRef, GlyphLayout, Renderer};

use std::str::FromStr;

/// The data structures passed between backends
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// A glyph that knows exactly where it belongs
    ///
    /// `x` and `y` are pixels from the run's pen origin; `y` points up.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PositionedGlyph {
        pub id: GlyphId,
        pub x: f32,
        pub y: f32,
        pub cluster: u32,
    }

    /// What emerges after layout: glyphs in drawing order
    #[derive(Debug, Clone)]
    pub struct GlyphRun {
        pub glyphs: Vec<PositionedGlyph>,
        pub advance_width: f32,
        /// Pixels per em the run was laid out at
        pub size: f32,
    }

    impl GlyphRun {
        pub fn empty(size: f32) -> Self {
            Self {
                glyphs: Vec::new(),
                advance_width: 0.0,
                size,
            }
        }
    }

    /// Outline bounds of one glyph in font units, y-up
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct GlyphBounds {
        pub x_min: f32,
        pub y_min: f32,
        pub x_max: f32,
        pub y_max: f32,
    }

    /// Ink box in pixels, y-down
    ///
    /// Coordinates are relative to whatever origin the producer states: the
    /// pen origin on the baseline for measurements, the canvas for placed text.
    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    pub struct TextBox {
        pub left: f32,
        pub top: f32,
        pub width: f32,
        pub height: f32,
    }

    impl TextBox {
        pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
            Self {
                left,
                top,
                width,
                height,
            }
        }

        pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
            Self::new(left, top, right - left, bottom - top)
        }

        pub fn right(&self) -> f32 {
            self.left + self.width
        }

        pub fn bottom(&self) -> f32 {
            self.top + self.height
        }

        pub fn center(&self) -> (f32, f32) {
            (
                self.left + self.width / 2.0,
                self.top + self.height / 2.0,
            )
        }

        /// No ink at all
        pub fn is_empty(&self) -> bool {
            self.width <= 0.0 && self.height <= 0.0
        }

        /// Smallest box holding both; empty boxes are ignored
        pub fn union(&self, other: &TextBox) -> TextBox {
            if self.is_empty() {
                return *other;
            }
            if other.is_empty() {
                return *self;
            }
            TextBox::from_edges(
                self.left.min(other.left),
                self.top.min(other.top),
                self.right().max(other.right()),
                self.bottom().max(other.bottom()),
            )
        }

        pub fn translate(&self, dx: f32, dy: f32) -> TextBox {
            TextBox::new(self.left + dx, self.top + dy, self.width, self.height)
        }
    }

    /// Raw pixel data
    #[derive(Debug, Clone, PartialEq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub format: BitmapFormat,
        pub data: Vec<u8>,
    }

    impl BitmapData {
        pub fn bytes_per_pixel(&self) -> usize {
            self.format.bytes_per_pixel()
        }
    }

    /// How pixels are arranged in the bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BitmapFormat {
        Rgba8,
        Rgb8,
        Gray8,
    }

    impl BitmapFormat {
        pub fn bytes_per_pixel(self) -> usize {
            match self {
                BitmapFormat::Rgba8 => 4,
                BitmapFormat::Rgb8 => 3,
                BitmapFormat::Gray8 => 1,
            }
        }
    }

    /// Gray8 coverage for a whole run
    ///
    /// `left`/`top` place the bitmap's top-left pixel relative to the pen
    /// origin on the baseline, y-down.
    #[derive(Debug, Clone, PartialEq)]
    pub struct GlyphMask {
        pub bitmap: BitmapData,
        pub left: i32,
        pub top: i32,
    }

    impl GlyphMask {
        pub fn empty() -> Self {
            Self {
                bitmap: BitmapData {
                    width: 0,
                    height: 0,
                    format: BitmapFormat::Gray8,
                    data: Vec::new(),
                },
                left: 0,
                top: 0,
            }
        }

        pub fn is_empty(&self) -> bool {
            self.bitmap.width == 0 || self.bitmap.height == 0
        }
    }
}

/// How glyph layout should behave
#[derive(Debug, Clone)]
pub struct ShapingParams {
    /// Pixels per em
    pub size: f32,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self { size: 16.0 }
    }
}

impl ShapingParams {
    pub fn sized(size: f32) -> Self {
        Self { size }
    }
}

/// How rasterization should look
#[derive(Debug, Clone)]
pub struct RenderParams {
    pub antialias: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self { antialias: true }
    }
}

/// Simple RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// CSS-style named colors used by certificate templates
    pub fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::black(),
            "white" => Self::white(),
            "green" => Self::rgb(0, 128, 0),
            "red" => Self::rgb(255, 0, 0),
            "blue" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "gold" => Self::rgb(255, 215, 0),
            "navy" => Self::rgb(0, 0, 128),
            _ => return None,
        };
        Some(color)
    }

    /// `#RRGGBB` or `#RRGGBBAA` as written in layout files
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = error::ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(color) = Self::named(trimmed) {
            return Ok(color);
        }

        let invalid = || error::ConfigError::Invalid(format!("invalid color: {s:?}"));
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::types::TextBox;
    use super::*;

    #[test]
    fn test_color_named_and_hex() {
        assert_eq!("green".parse::<Color>().unwrap(), Color::rgb(0, 128, 0));
        assert_eq!("White".parse::<Color>().unwrap(), Color::white());
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(
            "#10203040".parse::<Color>().unwrap(),
            Color::rgba(0x10, 0x20, 0x30, 0x40)
        );
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!("chartreuse-ish".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(color.to_hex().parse::<Color>().unwrap(), color);
        assert_eq!(Color::black().to_hex(), "#000000");
    }

    #[test]
    fn test_text_box_union_ignores_empty() {
        let a = TextBox::new(10.0, -30.0, 20.0, 40.0);
        assert_eq!(a.union(&TextBox::default()), a);
        assert_eq!(TextBox::default().union(&a), a);

        let b = TextBox::new(40.0, -10.0, 10.0, 15.0);
        let both = a.union(&b);
        assert_eq!(both, TextBox::from_edges(10.0, -30.0, 50.0, 10.0));
        assert_eq!(both.center(), (30.0, -10.0));
    }
}
