//! Exam styling settings

use serde::{Deserialize, Serialize};

/// Styling options applied to every page of the exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamSettings {
    /// Multiplier for all body text sizes
    pub font_scale: f32,
    /// Text drawn behind the content of every page (empty for none)
    pub watermark_text: String,
    /// Whether to draw a decorative page border
    pub show_border: bool,
    /// Treat a declared total that differs from the marks sum as an error
    pub strict_marks: bool,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            font_scale: 1.0,
            watermark_text: String::new(),
            show_border: false,
            strict_marks: false,
        }
    }
}

impl ExamSettings {
    /// The watermark, if one is set
    pub fn watermark(&self) -> Option<&str> {
        let text = self.watermark_text.trim();
        (!text.is_empty()).then_some(text)
    }

    /// Whether the font scale is usable for layout
    pub fn font_scale_is_valid(&self) -> bool {
        self.font_scale.is_finite() && self.font_scale > 0.0
    }
}
