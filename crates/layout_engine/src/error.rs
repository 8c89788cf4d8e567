//! Error types for layout engine

use doc_model::{QuestionId, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Question {number} ({id}) has {count} options, only 26 can be lettered")]
    TooManyOptions {
        id: QuestionId,
        number: usize,
        count: usize,
    },

    #[error("Invalid page setup: {0}")]
    InvalidPageSetup(String),

    #[error("Document is invalid: {0}")]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
