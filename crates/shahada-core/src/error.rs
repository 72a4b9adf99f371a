//! Error types for shahada
//!
//! Resource and configuration failures abort a render and reach the caller
//! as distinct variants. Shaping fallbacks and over-width words never show
//! up here; they are absorbed where they happen.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShahadaError>;

/// Main error type for shahada
#[derive(Debug, Error)]
pub enum ShahadaError {
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Layout failed: {0}")]
    Shaping(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl ShahadaError {
    /// A template or font could not be loaded
    pub fn is_resource(&self) -> bool {
        matches!(self, ShahadaError::Resource(_))
    }

    /// The template layout is wrong and needs fixing
    pub fn is_configuration(&self) -> bool {
        matches!(self, ShahadaError::Configuration(_))
    }
}

/// Template or font resources that could not be loaded
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Template image not found: {0}")]
    TemplateNotFound(String),

    #[error("Template image {path} could not be read: {reason}")]
    TemplateUnreadable { path: String, reason: String },

    #[error("Template image could not be decoded: {0}")]
    TemplateDecode(String),

    #[error("Font file not found: {0}")]
    FontNotFound(String),

    #[error("Font file {path} could not be read: {reason}")]
    FontUnreadable { path: String, reason: String },

    #[error("Invalid font data")]
    InvalidFontData,
}

/// Template misconfiguration; always names the offending field or region
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{region}: width must be positive, got {width}")]
    NonPositiveWidth { region: String, width: i32 },

    #[error("{field}: anchor ({x}, {y}) lies outside the {width}x{height} canvas")]
    AnchorOutOfBounds {
        field: String,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("{field}: font size must be positive, got {size}")]
    NonPositiveFontSize { field: String, size: f32 },

    #[error("{0}")]
    Invalid(String),
}

/// Glyph layout errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Rasterization errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Font data cannot be parsed for outlines")]
    InvalidFont,

    #[error("Outline extraction failed for glyph {0}")]
    OutlineExtractionFailed(u32),

    #[error("Failed to build path")]
    PathBuildingFailed,

    #[error("Failed to allocate pixmap")]
    PixmapCreationFailed,
}

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
