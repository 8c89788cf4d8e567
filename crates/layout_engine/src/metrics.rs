//! Text measurement for pagination estimates
//!
//! Widths are estimated per grapheme cluster with a fixed average advance,
//! and lines are broken greedily at Unicode line-break opportunities. The
//! estimate is deterministic so preview and export paginate identically.

use serde::Serialize;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Typographic role of a piece of exam text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextRole {
    SchoolName,
    Campus,
    ExamTitle,
    HeaderInfo,
    SectionHeading,
    Instruction,
    QuestionText,
    OptionText,
    MarksLabel,
    Watermark,
}

impl TextRole {
    /// Font size in points at font scale 1.0
    pub fn base_size(&self) -> f32 {
        match self {
            TextRole::SchoolName => 16.0,
            TextRole::Campus => 11.0,
            TextRole::ExamTitle => 13.0,
            TextRole::HeaderInfo => 11.0,
            TextRole::SectionHeading => 12.0,
            TextRole::Instruction => 11.0,
            TextRole::QuestionText => 11.0,
            TextRole::OptionText => 11.0,
            TextRole::MarksLabel => 11.0,
            TextRole::Watermark => 60.0,
        }
    }

    /// Whether the role is set in bold
    pub fn bold(&self) -> bool {
        matches!(
            self,
            TextRole::SchoolName | TextRole::ExamTitle | TextRole::SectionHeading | TextRole::MarksLabel
        )
    }

    /// Whether the role is set in italics
    pub fn italic(&self) -> bool {
        matches!(self, TextRole::Instruction)
    }
}

/// Font metrics used for estimates
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    /// Average glyph advance as a fraction of the font size
    pub avg_char_width_em: f32,
    /// Extra advance for bold text as a fraction of the regular advance
    pub bold_widening: f32,
    /// Line height as a multiple of the font size
    pub line_height_factor: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            avg_char_width_em: 0.5,
            bold_widening: 0.08,
            line_height_factor: 1.3,
        }
    }
}

impl TextMetrics {
    /// Font size for a role at a font scale
    pub fn font_size(&self, role: TextRole, scale: f32) -> f32 {
        role.base_size() * scale
    }

    /// Line height for a font size
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_factor
    }

    /// Estimated advance of a single grapheme
    fn advance(&self, font_size: f32, bold: bool) -> f32 {
        let widen = if bold { 1.0 + self.bold_widening } else { 1.0 };
        font_size * self.avg_char_width_em * widen
    }

    /// Estimated width of a string
    pub fn text_width(&self, text: &str, font_size: f32, bold: bool) -> f32 {
        text.graphemes(true).count() as f32 * self.advance(font_size, bold)
    }

    /// Break text into lines no wider than `max_width`.
    ///
    /// A segment wider than the line is placed on its own line and allowed
    /// to overflow. Always returns at least one line.
    pub fn wrap(&self, text: &str, font_size: f32, bold: bool, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0;
        let mut start = 0;

        for (end, opportunity) in linebreaks(text) {
            let segment = &text[start..end];
            start = end;

            let visible = segment.trim_end();
            let visible_width = self.text_width(visible, font_size, bold);

            if !current.is_empty() && current_width + visible_width > max_width {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_width = 0.0;
            }

            current.push_str(segment);
            current_width += self.text_width(segment, font_size, bold);

            if opportunity == BreakOpportunity::Mandatory && end < text.len() {
                lines.push(current.trim_end().to_string());
                current.clear();
                current_width = 0.0;
            }
        }

        lines.push(current.trim_end().to_string());
        lines
    }

    /// Height of wrapped text
    pub fn wrapped_height(&self, text: &str, role: TextRole, scale: f32, max_width: f32) -> f32 {
        let size = self.font_size(role, scale);
        self.wrap(text, size, role.bold(), max_width).len() as f32 * self.line_height(size)
    }
}

/// Text as every surface shows it. Line endings become `\n`; control
/// characters other than tab and newline are dropped.
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| if c == '\r' { '\n' } else { c })
        .filter(|&c| matches!(c, '\t' | '\n') || !(c.is_control() || matches!(c, '\u{FFFE}' | '\u{FFFF}')))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(normalize_text("x\u{0}\u{7}\u{1B}y\u{7F}"), "xy");
        assert_eq!(normalize_text("1\t2\n"), "1\t2\n");
        assert_eq!(normalize_text("H₂O ✓"), "H₂O ✓");
    }

    #[test]
    fn test_text_width_counts_graphemes() {
        let metrics = TextMetrics::default();
        // "O₂" is two graphemes
        assert_eq!(metrics.text_width("O₂", 10.0, false), 10.0);
        assert_eq!(metrics.text_width("", 10.0, false), 0.0);
    }

    #[test]
    fn test_wrap_short_text_single_line() {
        let metrics = TextMetrics::default();
        let lines = metrics.wrap("Define Bond Energy", 11.0, false, 500.0);
        assert_eq!(lines, vec!["Define Bond Energy".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let metrics = TextMetrics::default();
        // 10pt at 0.5em is 5pt per grapheme; 40pt fits 8 graphemes
        let lines = metrics.wrap("alpha beta gamma", 10.0, false, 40.0);
        assert_eq!(lines, vec!["alpha".to_string(), "beta".to_string(), "gamma".to_string()]);
    }

    #[test]
    fn test_wrap_overlong_word_overflows() {
        let metrics = TextMetrics::default();
        let lines = metrics.wrap("supercalifragilistic ok", 10.0, false, 20.0);
        assert_eq!(lines[0], "supercalifragilistic");
        assert_eq!(lines[1], "ok");
    }

    #[test]
    fn test_wrap_mandatory_break() {
        let metrics = TextMetrics::default();
        let lines = metrics.wrap("line one\nline two", 10.0, false, 1000.0);
        assert_eq!(lines, vec!["line one".to_string(), "line two".to_string()]);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let metrics = TextMetrics::default();
        assert_eq!(metrics.wrap("", 10.0, false, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_larger_font_never_fewer_lines() {
        let metrics = TextMetrics::default();
        let text = "In the reaction 2Na+ 2H₂O → 2NaOH + H₂, if 23g of Na reacts with excess of water";
        let small = metrics.wrap(text, 11.0, false, 300.0).len();
        let large = metrics.wrap(text, 22.0, false, 300.0).len();
        assert!(large >= small);
    }
}
