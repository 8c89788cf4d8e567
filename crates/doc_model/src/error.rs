//! Error types for document model operations

use crate::{Bucket, QuestionId};
use thiserror::Error;

/// A violated exam model invariant.
///
/// Validation errors block export but never editing: the document stays
/// editable so the user can fix the reported question.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Multiple-choice question {number} ({id}) has no options")]
    EmptyOptions { id: QuestionId, number: usize },

    #[error("{bucket} question {number} ({id}) must not have options")]
    UnexpectedOptions {
        bucket: Bucket,
        id: QuestionId,
        number: usize,
    },

    #[error("Question id {0} is used more than once")]
    DuplicateQuestionId(QuestionId),

    #[error("Font scale must be a positive number, got {0}")]
    InvalidFontScale(f32),

    #[error("Declared total marks {declared} do not match the question marks sum {computed}")]
    MarksMismatch { declared: u32, computed: u32 },
}

impl ValidationError {
    /// Whether two issues are the same problem at the same place. Values
    /// carried only for the message, such as the rejected font scale, are
    /// not compared.
    pub fn same_issue(&self, other: &Self) -> bool {
        match (self, other) {
            (ValidationError::InvalidFontScale(_), ValidationError::InvalidFontScale(_)) => true,
            (ValidationError::MarksMismatch { .. }, ValidationError::MarksMismatch { .. }) => true,
            _ => self == other,
        }
    }
}

/// Errors decoding an embedded logo image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("Image source is empty")]
    Empty,

    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),

    #[error("Malformed data URI: {0}")]
    MalformedDataUri(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
