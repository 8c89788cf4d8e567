//! Exam document root aggregate and document-level operations

use crate::serde_helpers::null_as_default;
use crate::{Bucket, ExamHeader, ExamSettings, Question, QuestionId, QuestionKind};
use serde::{Deserialize, Serialize};

/// The root exam document.
///
/// Field names match the snapshot format written by earlier versions of the
/// application, so an old snapshot loads without conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamDocument {
    pub header: ExamHeader,
    pub settings: ExamSettings,
    #[serde(deserialize_with = "null_as_default")]
    pub mcqs: Vec<Question>,
    #[serde(deserialize_with = "null_as_default")]
    pub short_questions: Vec<Question>,
    #[serde(deserialize_with = "null_as_default")]
    pub long_questions: Vec<Question>,
    pub mcq_instruction: String,
    pub short_instruction: String,
    pub long_instruction: String,
}

/// Read-only view of one bucket
#[derive(Debug, Clone, Copy)]
pub struct BucketView<'a> {
    pub bucket: Bucket,
    pub instruction: &'a str,
    pub questions: &'a [Question],
}

impl<'a> BucketView<'a> {
    /// Sum of scored marks in this bucket
    pub fn marks(&self) -> u32 {
        self.questions
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.scored_marks()))
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Relationship between the declared and computed total marks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksStatus {
    /// Declared total equals the marks sum
    Matches(u32),
    /// Declared total differs; displayed as entered
    Mismatch { declared: u32, computed: u32 },
}

impl ExamDocument {
    /// Create an empty document with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in template used when no snapshot exists
    pub fn default_template() -> Self {
        crate::template::default_exam()
    }

    /// View a bucket
    pub fn bucket(&self, bucket: Bucket) -> BucketView<'_> {
        let (instruction, questions) = match bucket {
            Bucket::MultipleChoice => (&self.mcq_instruction, &self.mcqs),
            Bucket::ShortAnswer => (&self.short_instruction, &self.short_questions),
            Bucket::LongAnswer => (&self.long_instruction, &self.long_questions),
        };
        BucketView {
            bucket,
            instruction: instruction.as_str(),
            questions: questions.as_slice(),
        }
    }

    /// Iterate over all buckets in exam order
    pub fn buckets(&self) -> impl Iterator<Item = BucketView<'_>> {
        Bucket::ALL.into_iter().map(move |b| self.bucket(b))
    }

    /// Mutable access to a bucket's questions
    pub fn questions_mut(&mut self, bucket: Bucket) -> &mut Vec<Question> {
        match bucket {
            Bucket::MultipleChoice => &mut self.mcqs,
            Bucket::ShortAnswer => &mut self.short_questions,
            Bucket::LongAnswer => &mut self.long_questions,
        }
    }

    /// Mutable access to a bucket's instruction line
    pub fn instruction_mut(&mut self, bucket: Bucket) -> &mut String {
        match bucket {
            Bucket::MultipleChoice => &mut self.mcq_instruction,
            Bucket::ShortAnswer => &mut self.short_instruction,
            Bucket::LongAnswer => &mut self.long_instruction,
        }
    }

    /// All questions with their derived kind, in bucket order
    pub fn flat_questions(&self) -> impl Iterator<Item = (QuestionKind, &Question)> {
        self.buckets()
            .flat_map(|view| view.questions.iter().map(move |q| (view.bucket, q)))
    }

    /// Total number of questions
    pub fn question_count(&self) -> usize {
        self.mcqs.len() + self.short_questions.len() + self.long_questions.len()
    }

    /// Find a question by id, with its bucket and 0-based position
    pub fn find_question(&self, id: &QuestionId) -> Option<(Bucket, usize, &Question)> {
        self.buckets().find_map(|view| {
            view.questions
                .iter()
                .position(|q| &q.id == id)
                .map(|i| (view.bucket, i, &view.questions[i]))
        })
    }

    /// Find a question by id for editing
    pub fn find_question_mut(&mut self, id: &QuestionId) -> Option<&mut Question> {
        let (bucket, index, _) = self.find_question(id)?;
        self.questions_mut(bucket).get_mut(index)
    }

    /// Marks sum for one bucket
    pub fn bucket_marks(&self, bucket: Bucket) -> u32 {
        self.bucket(bucket).marks()
    }

    /// Sum of all question marks
    pub fn computed_total_marks(&self) -> u32 {
        self.buckets()
            .fold(0u32, |acc, view| acc.saturating_add(view.marks()))
    }

    /// Compare the declared total with the marks sum
    pub fn marks_status(&self) -> MarksStatus {
        let declared = self.header.total_marks;
        let computed = self.computed_total_marks();
        if declared == computed {
            MarksStatus::Matches(computed)
        } else {
            MarksStatus::Mismatch { declared, computed }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExamDocument {
        let mut doc = ExamDocument::new();
        doc.mcqs.push(Question::multiple_choice("Q1", ["a", "b"]).with_id("m1").with_marks(2));
        doc.short_questions.push(Question::new("S1").with_id("s1").with_marks(5));
        doc.long_questions.push(Question::new("L1").with_id("l1"));
        doc
    }

    #[test]
    fn test_find_question() {
        let doc = sample();
        let (bucket, index, q) = doc.find_question(&"s1".into()).unwrap();
        assert_eq!(bucket, Bucket::ShortAnswer);
        assert_eq!(index, 0);
        assert_eq!(q.text, "S1");
        assert!(doc.find_question(&"missing".into()).is_none());
    }

    #[test]
    fn test_find_question_mut() {
        let mut doc = sample();
        doc.find_question_mut(&"l1".into()).unwrap().marks = Some(15);
        assert_eq!(doc.bucket_marks(Bucket::LongAnswer), 15);
    }

    #[test]
    fn test_flat_questions_derive_kind() {
        let doc = sample();
        let kinds: Vec<_> = doc.flat_questions().map(|(k, q)| (k.tag(), q.id.as_str())).collect();
        assert_eq!(kinds, vec![("MCQ", "m1"), ("SHORT", "s1"), ("LONG", "l1")]);
    }

    #[test]
    fn test_marks_status() {
        let mut doc = sample();
        doc.header.total_marks = 7;
        assert_eq!(doc.marks_status(), MarksStatus::Matches(7));
        doc.header.total_marks = 100;
        assert_eq!(
            doc.marks_status(),
            MarksStatus::Mismatch { declared: 100, computed: 7 }
        );
    }

    #[test]
    fn test_unknown_and_missing_fields() {
        let json = r#"{"header":{"schoolName":"GHS"},"futureField":42,"mcqs":null}"#;
        let doc: ExamDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.header.school_name, "GHS");
        assert!(doc.mcqs.is_empty());
        assert_eq!(doc.settings, ExamSettings::default());
    }
}
