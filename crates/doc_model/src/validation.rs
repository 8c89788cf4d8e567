//! Model invariant checks

use crate::{Bucket, ExamDocument, ExamSettings, MarksStatus, Question, Result, ValidationError};
use std::collections::HashSet;

impl ExamDocument {
    /// Check every model invariant, returning the first violation
    pub fn validate(&self) -> Result<()> {
        match self.validation_issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    /// Collect all invariant violations in document order
    pub fn validation_issues(&self) -> Vec<ValidationError> {
        let mut issues = settings_issues(&self.settings);

        for view in self.buckets() {
            issues.extend(bucket_issues(view.bucket, view.questions));
        }

        let mut seen = HashSet::new();
        for (_, question) in self.flat_questions() {
            if !seen.insert(&question.id) {
                issues.push(ValidationError::DuplicateQuestionId(question.id.clone()));
            }
        }

        if self.settings.strict_marks {
            if let MarksStatus::Mismatch { declared, computed } = self.marks_status() {
                issues.push(ValidationError::MarksMismatch { declared, computed });
            }
        }

        issues
    }
}

/// Invariant violations in the style settings
pub(crate) fn settings_issues(settings: &ExamSettings) -> Vec<ValidationError> {
    if settings.font_scale_is_valid() {
        Vec::new()
    } else {
        vec![ValidationError::InvalidFontScale(settings.font_scale)]
    }
}

/// Invariant violations inside one bucket; numbers are 1-based positions
pub(crate) fn bucket_issues(bucket: Bucket, questions: &[Question]) -> Vec<ValidationError> {
    questions
        .iter()
        .enumerate()
        .filter_map(|(i, q)| {
            let number = i + 1;
            if bucket.requires_options() && q.options.is_empty() {
                Some(ValidationError::EmptyOptions {
                    id: q.id.clone(),
                    number,
                })
            } else if !bucket.requires_options() && !q.options.is_empty() {
                Some(ValidationError::UnexpectedOptions {
                    bucket,
                    id: q.id.clone(),
                    number,
                })
            } else {
                None
            }
        })
        .collect()
}
