//! Error types for render model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Print output requires a print-mode render model")]
    NotPrintMode,
}

pub type Result<T> = std::result::Result<T, RenderError>;
