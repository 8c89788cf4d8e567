//! Typed partial documents and shallow merging
//!
//! Content generators return only the sections they filled. Each top-level
//! field is optional; present fields overwrite the document's field whole,
//! absent fields are left as they are.

use crate::validation::{bucket_issues, settings_issues};
use crate::{Bucket, ExamDocument, ExamHeader, ExamSettings, Question, Result, ValidationError};
use serde::{Deserialize, Serialize};

/// A document with every top-level section optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialExamDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<ExamHeader>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ExamSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcqs: Option<Vec<Question>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_questions: Option<Vec<Question>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_questions: Option<Vec<Question>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcq_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_instruction: Option<String>,
}

impl PartialExamDocument {
    /// Whether no section is present
    pub fn is_empty(&self) -> bool {
        self.header.is_none()
            && self.settings.is_none()
            && self.mcqs.is_none()
            && self.short_questions.is_none()
            && self.long_questions.is_none()
            && self.mcq_instruction.is_none()
            && self.short_instruction.is_none()
            && self.long_instruction.is_none()
    }

    /// Questions supplied for a bucket
    pub fn questions(&self, bucket: Bucket) -> Option<&[Question]> {
        match bucket {
            Bucket::MultipleChoice => self.mcqs.as_deref(),
            Bucket::ShortAnswer => self.short_questions.as_deref(),
            Bucket::LongAnswer => self.long_questions.as_deref(),
        }
    }

    /// Check the supplied sections on their own
    pub fn validate(&self) -> Result<()> {
        if let Some(settings) = &self.settings {
            if let Some(issue) = settings_issues(settings).into_iter().next() {
                return Err(issue);
            }
        }
        for bucket in Bucket::ALL {
            if let Some(questions) = self.questions(bucket) {
                if let Some(issue) = bucket_issues(bucket, questions).into_iter().next() {
                    return Err(issue);
                }
            }
        }
        Ok(())
    }

    /// Names of the sections present, for logging
    pub fn present_sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::new();
        if self.header.is_some() {
            sections.push("header");
        }
        if self.settings.is_some() {
            sections.push("settings");
        }
        if self.mcqs.is_some() {
            sections.push("mcqs");
        }
        if self.short_questions.is_some() {
            sections.push("shortQuestions");
        }
        if self.long_questions.is_some() {
            sections.push("longQuestions");
        }
        if self.mcq_instruction.is_some() {
            sections.push("mcqInstruction");
        }
        if self.short_instruction.is_some() {
            sections.push("shortInstruction");
        }
        if self.long_instruction.is_some() {
            sections.push("longInstruction");
        }
        sections
    }
}

impl ExamDocument {
    /// Shallow-merge a partial document.
    ///
    /// The merge is all-or-nothing: the partial is validated on its own and
    /// the merged result may not introduce violations the document did not
    /// already have. On error `self` is unchanged.
    pub fn merge(&mut self, partial: PartialExamDocument) -> Result<()> {
        partial.validate()?;

        let mut merged = self.clone();
        merged.apply(partial);

        let existing = self.validation_issues();
        if let Some(issue) = merged
            .validation_issues()
            .into_iter()
            .find(|issue| !existing.iter().any(|old| old.same_issue(issue)))
        {
            return Err(issue);
        }

        *self = merged;
        Ok(())
    }

    fn apply(&mut self, partial: PartialExamDocument) {
        let PartialExamDocument {
            header,
            settings,
            mcqs,
            short_questions,
            long_questions,
            mcq_instruction,
            short_instruction,
            long_instruction,
        } = partial;

        if let Some(header) = header {
            self.header = header;
        }
        if let Some(settings) = settings {
            self.settings = settings;
        }
        if let Some(mcqs) = mcqs {
            self.mcqs = mcqs;
        }
        if let Some(short_questions) = short_questions {
            self.short_questions = short_questions;
        }
        if let Some(long_questions) = long_questions {
            self.long_questions = long_questions;
        }
        if let Some(text) = mcq_instruction {
            self.mcq_instruction = text;
        }
        if let Some(text) = short_instruction {
            self.short_instruction = text;
        }
        if let Some(text) = long_instruction {
            self.long_instruction = text;
        }
    }
}

impl From<ExamDocument> for PartialExamDocument {
    fn from(doc: ExamDocument) -> Self {
        Self {
            header: Some(doc.header),
            settings: Some(doc.settings),
            mcqs: Some(doc.mcqs),
            short_questions: Some(doc.short_questions),
            long_questions: Some(doc.long_questions),
            mcq_instruction: Some(doc.mcq_instruction),
            short_instruction: Some(doc.short_instruction),
            long_instruction: Some(doc.long_instruction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only_merge_preserves_rest() {
        let mut doc = ExamDocument::default_template();
        let before = doc.clone();

        let partial: PartialExamDocument =
            serde_json::from_str(r#"{"header":{"schoolName":"City School","subject":"PHYSICS"}}"#)
                .unwrap();
        doc.merge(partial).unwrap();

        assert_eq!(doc.header.school_name, "City School");
        assert_eq!(doc.header.subject, "PHYSICS");
        assert_eq!(doc.mcqs, before.mcqs);
        assert_eq!(doc.short_questions, before.short_questions);
        assert_eq!(doc.long_questions, before.long_questions);
        assert_eq!(doc.settings, before.settings);
        assert_eq!(doc.mcq_instruction, before.mcq_instruction);
    }

    #[test]
    fn test_existing_nan_font_scale_does_not_block_merge() {
        let mut doc = ExamDocument::default_template();
        doc.settings.font_scale = f32::NAN;

        let partial = PartialExamDocument {
            short_instruction: Some("Attempt any five.".into()),
            ..Default::default()
        };
        doc.merge(partial).unwrap();
        assert_eq!(doc.short_instruction, "Attempt any five.");
        assert!(matches!(
            doc.validation_issues()[..],
            [ValidationError::InvalidFontScale(scale)] if scale.is_nan()
        ));
    }

    #[test]
    fn test_invalid_partial_rejected_without_mutation() {
        let mut doc = ExamDocument::default_template();
        let before = doc.clone();

        let partial = PartialExamDocument {
            header: Some(ExamHeader::default()),
            mcqs: Some(vec![Question::new("No options here").with_id("g1")]),
            ..Default::default()
        };
        assert!(matches!(doc.merge(partial), Err(ValidationError::EmptyOptions { .. })));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_merge_rejects_new_duplicate_ids() {
        let mut doc = ExamDocument::default_template();
        let before = doc.clone();

        let partial = PartialExamDocument {
            long_questions: Some(vec![Question::new("Clashes with s1").with_id("s1")]),
            ..Default::default()
        };
        assert_eq!(
            doc.merge(partial),
            Err(ValidationError::DuplicateQuestionId("s1".into()))
        );
        assert_eq!(doc, before);
    }

    #[test]
    fn test_merge_tolerates_existing_issues() {
        let mut doc = ExamDocument::default_template();
        doc.mcqs[0].options.clear();

        let partial = PartialExamDocument {
            long_instruction: Some("Answer any one.".into()),
            ..Default::default()
        };
        doc.merge(partial).unwrap();
        assert_eq!(doc.long_instruction, "Answer any one.");
    }

    #[test]
    fn test_empty_partial() {
        let partial = PartialExamDocument::default();
        assert!(partial.is_empty());
        assert!(partial.present_sections().is_empty());

        let full = PartialExamDocument::from(ExamDocument::new());
        assert_eq!(full.present_sections().len(), 8);
    }

    proptest::proptest! {
        #[test]
        fn prop_instruction_merge_is_shallow(
            mcq in proptest::option::of(".{0,40}"),
            short in proptest::option::of(".{0,40}"),
            long in proptest::option::of(".{0,40}"),
        ) {
            let mut doc = ExamDocument::default_template();
            let before = doc.clone();
            let partial = PartialExamDocument {
                mcq_instruction: mcq.clone(),
                short_instruction: short.clone(),
                long_instruction: long.clone(),
                ..Default::default()
            };

            doc.merge(partial).unwrap();
            proptest::prop_assert_eq!(&doc.mcqs, &before.mcqs);
            proptest::prop_assert_eq!(&doc.header, &before.header);
            proptest::prop_assert_eq!(doc.mcq_instruction, mcq.unwrap_or(before.mcq_instruction));
            proptest::prop_assert_eq!(doc.short_instruction, short.unwrap_or(before.short_instruction));
            proptest::prop_assert_eq!(doc.long_instruction, long.unwrap_or(before.long_instruction));
        }
    }
}
