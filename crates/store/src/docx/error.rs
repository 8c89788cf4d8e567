//! Error types for DOCX operations

use doc_model::{Bucket, ValidationError};
use layout_engine::LayoutError;
use thiserror::Error;

/// Errors that can occur during DOCX export
#[derive(Debug, Error)]
pub enum DocxError {
    /// IO error (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// The exam violates a model invariant
    #[error("Exam is not valid: {0}")]
    Validation(#[from] ValidationError),

    /// The exam could not be laid out
    #[error("Layout failed: {0}")]
    Layout(LayoutError),

    /// A question block failed during layout
    #[error("{bucket} question {number} could not be exported: {message}")]
    BlockFailed {
        bucket: Bucket,
        number: usize,
        message: String,
    },

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// Package structure does not describe a Word document
    #[error("Not a DOCX package: {0}")]
    InvalidPackage(String),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<LayoutError> for DocxError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::Validation(e) => DocxError::Validation(e),
            other => DocxError::Layout(other),
        }
    }
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocxError::XmlParse(format!("Attribute error: {}", err))
    }
}

/// Result type for DOCX operations
pub type DocxResult<T> = std::result::Result<T, DocxError>;
