//! Pixels in, pixels out
//!
//! Certificates start life as a template image and end as a PNG. Both ends
//! of that trip go through the `image` crate:
//!
//! - [`decode_template`] turns encoded template bytes into an RGBA canvas
//! - [`PngExporter`] turns the finished canvas back into PNG bytes

pub mod png;
pub mod template;

pub use png::{encode_bitmap_to_png, PngExporter};
pub use template::decode_template;
