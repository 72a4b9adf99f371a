//! Greedy word wrapping measured on shaped text
//!
//! Lines stay logical text in reading order. Each candidate line is shaped
//! before it is measured, so joined Arabic forms are what decide the break,
//! never the width of the unjoined letters.

use shahada_core::{
    error::{ConfigError, Result},
    LogicalText, ScriptHint, TextShaper,
};

use crate::metrics::{SizedFont, TextMeasurer};

/// Breaks a paragraph into lines no wider than a pixel budget
pub struct LineWrapper<'a> {
    shaper: &'a TextShaper,
    measurer: &'a TextMeasurer,
}

impl<'a> LineWrapper<'a> {
    pub fn new(shaper: &'a TextShaper, measurer: &'a TextMeasurer) -> Self {
        Self { shaper, measurer }
    }

    /// Shaped ink width of a logical line
    pub fn line_width(&self, line: &LogicalText, font: &SizedFont, hint: ScriptHint) -> Result<f32> {
        let shaped = self.shaper.shape(line, hint);
        Ok(self.measurer.measure(&shaped, font)?.width)
    }

    /// Wrap `paragraph` into lines whose shaped width fits `max_width`
    ///
    /// A single word wider than `max_width` still gets a line of its own.
    /// Empty and whitespace-only paragraphs give no lines.
    pub fn wrap(
        &self,
        paragraph: &LogicalText,
        font: &SizedFont,
        hint: ScriptHint,
        max_width: i32,
    ) -> Result<Vec<LogicalText>> {
        if max_width <= 0 {
            return Err(ConfigError::NonPositiveWidth {
                region: "paragraph".to_string(),
                width: max_width,
            }
            .into());
        }

        let limit = max_width as f32;
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in paragraph.words() {
            let candidate = if current.is_empty() {
                LogicalText::from(word)
            } else {
                LogicalText::new(format!("{current} {word}"))
            };

            if self.line_width(&candidate, font, hint)? <= limit {
                current = candidate.into_string();
                continue;
            }

            if current.is_empty() {
                // Nothing to break before: the word goes out over-width
                log::warn!(
                    "word of {} chars is wider than {}px; emitting it on its own line",
                    word.chars().count(),
                    max_width
                );
                lines.push(candidate);
            } else {
                lines.push(LogicalText::new(std::mem::take(&mut current)));
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            lines.push(LogicalText::new(current));
        }

        log::debug!("wrapped paragraph into {} lines at {}px", lines.len(), max_width);
        Ok(lines)
    }
}
