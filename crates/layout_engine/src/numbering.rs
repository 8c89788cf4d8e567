//! Question numbering and option lettering
//!
//! Numbers are 1-based and restart for every bucket. Options are lettered by
//! their position in the options array: index 0 is `A`, index 25 is `Z`.

use crate::normalize_text;
use serde::Serialize;

/// Largest option count that can be lettered
pub const MAX_OPTIONS: usize = 26;

/// Marker shown in place of a marks label for unscored questions
pub const UNSCORED_MARKER: &str = "—";

/// A lettered option ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetteredOption {
    /// Option letter (`A`..`Z`)
    pub letter: char,
    /// Option text with line endings normalized
    pub text: String,
}

impl LetteredOption {
    /// Display label, e.g. `(A)`
    pub fn label(&self) -> String {
        format!("({})", self.letter)
    }

    /// Full display text, e.g. `(A) 6.02 × 10²³`
    pub fn display_text(&self) -> String {
        format!("{} {}", self.label(), self.text)
    }
}

/// Letter for an option position, `None` past `Z`
pub fn option_letter(index: usize) -> Option<char> {
    if index < MAX_OPTIONS {
        Some((b'A' + index as u8) as char)
    } else {
        None
    }
}

/// Letter every option in array order.
///
/// Returns the option count as the error when there are too many to letter.
pub fn letter_options(options: &[String]) -> std::result::Result<Vec<LetteredOption>, usize> {
    options
        .iter()
        .enumerate()
        .map(|(i, text)| {
            option_letter(i)
                .map(|letter| LetteredOption {
                    letter,
                    text: normalize_text(text),
                })
                .ok_or(options.len())
        })
        .collect()
}

/// Display label for a question number, e.g. `3.`
pub fn number_label(number: usize) -> String {
    format!("{}.", number)
}

/// Display label for a question's marks
pub fn marks_label(marks: Option<u32>) -> String {
    match marks {
        Some(m) => format!("({})", m),
        None => UNSCORED_MARKER.to_string(),
    }
}
