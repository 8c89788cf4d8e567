//! Store - Snapshot persistence, settings and DOCX export
//!
//! This crate keeps the working exam in a single storage slot, loads and
//! saves application settings, and writes laid-out exams as DOCX packages.

mod error;
mod snapshot;
mod settings;
pub mod docx;

pub use error::*;
pub use snapshot::*;
pub use settings::*;

// Re-export DOCX functionality
pub use docx::{
    docx_filename, export_docx, export_docx_bytes, export_docx_with, export_plan_bytes,
    read_visible_paragraphs, write_package, DocxError, DocxResult, ExportOptions,
};
