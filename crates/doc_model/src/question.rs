//! Questions, question identifiers and buckets

use crate::serde_helpers::null_as_default;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable correlation key for a question.
///
/// Snapshots written by earlier versions use short ids such as `m1`, so the
/// id is an arbitrary string; freshly created questions get a UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Create a new random question id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One of the three question groupings of an exam.
///
/// Bucket membership is the only source of a question's kind; questions do
/// not carry their own type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    MultipleChoice,
    ShortAnswer,
    LongAnswer,
}

/// The kind of a question is the bucket it resides in
pub type QuestionKind = Bucket;

impl Bucket {
    /// All buckets in exam order
    pub const ALL: [Bucket; 3] = [Bucket::MultipleChoice, Bucket::ShortAnswer, Bucket::LongAnswer];

    /// Boundary tag used when questions are listed outside their bucket
    pub fn tag(&self) -> &'static str {
        match self {
            Bucket::MultipleChoice => "MCQ",
            Bucket::ShortAnswer => "SHORT",
            Bucket::LongAnswer => "LONG",
        }
    }

    /// Parse a boundary tag
    pub fn from_tag(tag: &str) -> Option<Bucket> {
        match tag.to_ascii_uppercase().as_str() {
            "MCQ" | "MULTIPLE_CHOICE" => Some(Bucket::MultipleChoice),
            "SHORT" | "SHORT_ANSWER" => Some(Bucket::ShortAnswer),
            "LONG" | "LONG_ANSWER" => Some(Bucket::LongAnswer),
            _ => None,
        }
    }

    /// Whether questions in this bucket must carry options
    pub fn requires_options(&self) -> bool {
        matches!(self, Bucket::MultipleChoice)
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Bucket::MultipleChoice => "Multiple-choice",
            Bucket::ShortAnswer => "Short-answer",
            Bucket::LongAnswer => "Long-answer",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single exam question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Correlation key, stable across edits
    #[serde(default)]
    pub id: QuestionId,
    /// Question text (Unicode, may contain math notation)
    #[serde(default)]
    pub text: String,
    /// Options in display order; only multiple-choice questions have them
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Marks awarded, absent for unscored questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<u32>,
}

impl Question {
    /// Create a question with a fresh id and no options
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: QuestionId::new(),
            text: text.into(),
            options: Vec::new(),
            marks: None,
        }
    }

    /// Create a multiple-choice question
    pub fn multiple_choice<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new(text)
        }
    }

    /// Set the id
    pub fn with_id(mut self, id: impl Into<QuestionId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the marks
    pub fn with_marks(mut self, marks: u32) -> Self {
        self.marks = Some(marks);
        self
    }

    /// Marks counted towards totals (unscored counts as zero)
    pub fn scored_marks(&self) -> u32 {
        self.marks.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_id_unique() {
        assert_ne!(QuestionId::new(), QuestionId::new());
    }

    #[test]
    fn test_bucket_tags() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::from_tag(bucket.tag()), Some(bucket));
        }
        assert_eq!(Bucket::from_tag("essay"), None);
    }

    #[test]
    fn test_legacy_type_field_ignored() {
        let json = r#"{"id":"s1","type":"SHORT","marks":5,"text":"Define bond energy"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id.as_str(), "s1");
        assert_eq!(q.marks, Some(5));
        assert!(q.options.is_empty());
    }

    #[test]
    fn test_null_options_deserialize_empty() {
        let json = r#"{"id":"l1","text":"Explain","options":null}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.options.is_empty());
        assert_eq!(q.marks, None);
    }

    #[test]
    fn test_builder() {
        let q = Question::multiple_choice("Pick one", ["a", "b"]).with_id("m9").with_marks(2);
        assert_eq!(q.id.as_str(), "m9");
        assert_eq!(q.options, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(q.scored_marks(), 2);
    }
}
