// this_file: crates/shahada-unicode/src/lib.rs

//! Logical text in, visual text out.
//!
//! Certificates are typed in reading order but drawn strictly left to right,
//! so every string crosses this crate exactly once on its way to the canvas:
//!
//! 1. **Reshaping** - Arabic letters take their isolated, initial, medial or
//!    final presentation form depending on their neighbours
//! 2. **Reordering** - the Unicode bidi algorithm lays right-to-left runs out
//!    in visual order while digits and Latin runs keep their natural order
//!
//! The two ends of that trip are separate types. [`LogicalText`] is what a
//! person typed; [`ShapedText`] can only be produced by [`TextShaper::shape`],
//! so nothing downstream can measure unshaped text or shape a string twice.

use std::fmt;

use ar_reshaper::{ArabicReshaper, ReshaperConfig};
use icu_properties::{
    props::{GeneralCategory, Script},
    CodePointMapData, CodePointMapDataBorrowed,
};
use unicode_bidi::{BidiInfo, Level};

/// Text in natural reading order, exactly as it was typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LogicalText(String);

impl LogicalText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-delimited words in reading order
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.split_whitespace()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for empty or whitespace-only text
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for LogicalText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for LogicalText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl fmt::Display for LogicalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text whose characters are already joined and stored in left-to-right display order
///
/// Only [`TextShaper::shape`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapedText {
    visual: String,
}

impl ShapedText {
    pub fn as_str(&self) -> &str {
        &self.visual
    }

    pub fn is_empty(&self) -> bool {
        self.visual.is_empty()
    }
}

impl fmt::Display for ShapedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.visual)
    }
}

/// What the caller knows about the script of a string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ScriptHint {
    /// Each paragraph takes the direction of its first strong character
    #[default]
    Auto,
    /// Right-to-left paragraph, Arabic letters joined
    Arabic,
    /// Left-to-right paragraph, no joining
    Latin,
}

impl ScriptHint {
    fn paragraph_level(self) -> Option<Level> {
        match self {
            ScriptHint::Auto => None,
            ScriptHint::Arabic => Some(Level::rtl()),
            ScriptHint::Latin => Some(Level::ltr()),
        }
    }
}

/// Reshapes and reorders logical text for left-to-right drawing.
pub struct TextShaper {
    reshaper: ArabicReshaper,
    script_map: CodePointMapDataBorrowed<'static, Script>,
    categories: CodePointMapDataBorrowed<'static, GeneralCategory>,
}

impl TextShaper {
    /// Create a shaper with the default reshaper configuration (lam-alef ligatures on).
    pub fn new() -> Self {
        Self::with_config(ReshaperConfig::default())
    }

    pub fn with_config(config: ReshaperConfig) -> Self {
        Self {
            reshaper: ArabicReshaper::new(config),
            script_map: CodePointMapData::<Script>::new(),
            categories: CodePointMapData::<GeneralCategory>::new(),
        }
    }

    fn contains_arabic(&self, text: &str) -> bool {
        text.chars()
            .any(|ch| matches!(self.script_map.get(ch), Script::Arabic))
    }

    /// Turn logical text into visual text.
    ///
    /// Never fails: code points the reshaper does not know are passed through
    /// untouched and simply reordered with their neighbours.
    pub fn shape(&self, text: &LogicalText, hint: ScriptHint) -> ShapedText {
        let source = text.as_str();
        if source.is_empty() {
            return ShapedText {
                visual: String::new(),
            };
        }

        let joined = if hint != ScriptHint::Latin && self.contains_arabic(source) {
            self.reshaper.reshape(source)
        } else {
            source.to_string()
        };

        let visual = reorder(&joined, hint.paragraph_level(), &self.categories);
        log::trace!(
            "shaped {} chars ({:?}) into {} visual chars",
            source.chars().count(),
            hint,
            visual.chars().count()
        );

        ShapedText { visual }
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

/// Shape with a throwaway [`TextShaper`].
pub fn shape(text: &LogicalText, hint: ScriptHint) -> ShapedText {
    TextShaper::new().shape(text, hint)
}

fn reorder(
    text: &str,
    level: Option<Level>,
    categories: &CodePointMapDataBorrowed<'static, GeneralCategory>,
) -> String {
    let bidi = BidiInfo::new(text, level);
    if bidi.paragraphs.is_empty() {
        return text.to_string();
    }

    let mut visual = String::with_capacity(text.len());
    for paragraph in &bidi.paragraphs {
        let (levels, runs) = bidi.visual_runs(paragraph, paragraph.range.clone());
        for run in runs {
            let slice = &text[run.clone()];
            let rtl = levels
                .get(run.start)
                .copied()
                .unwrap_or(paragraph.level)
                .is_rtl();
            if rtl {
                push_reversed(&mut visual, slice, categories);
            } else {
                visual.push_str(slice);
            }
        }
    }
    visual
}

/// Reverse a right-to-left run while keeping combining marks after their base (UAX #9, L3)
fn push_reversed(
    out: &mut String,
    run: &str,
    categories: &CodePointMapDataBorrowed<'static, GeneralCategory>,
) {
    let mut clusters: Vec<&str> = Vec::new();
    let mut start = 0;
    for (idx, ch) in run.char_indices() {
        let is_mark = matches!(
            categories.get(ch),
            GeneralCategory::NonspacingMark | GeneralCategory::EnclosingMark
        );
        if idx > 0 && !is_mark {
            clusters.push(&run[start..idx]);
            start = idx;
        }
    }
    if start < run.len() {
        clusters.push(&run[start..]);
    }

    for cluster in clusters.iter().rev() {
        out.push_str(cluster);
    }
}


#[cfg(test)]
mod proptests;
