//! Public API for DOCX export
//!
//! This module provides the main entry points for exporting exams.

use crate::docx::error::DocxResult;
use crate::docx::options::ExportOptions;
use crate::docx::writer::DocxWriter;
use doc_model::ExamDocument;
use layout_engine::{LayoutEngine, LayoutPlan};
use std::io::Cursor;
use std::path::Path;

/// Export an exam to an in-memory DOCX package with default settings
///
/// # Example
///
/// ```ignore
/// use store::docx::export_docx_bytes;
/// use doc_model::ExamDocument;
///
/// let bytes = export_docx_bytes(&ExamDocument::default_template())?;
/// std::fs::write("exam.docx", bytes)?;
/// ```
pub fn export_docx_bytes(doc: &ExamDocument) -> DocxResult<Vec<u8>> {
    export_docx_with(doc, &LayoutEngine::default(), &ExportOptions::default())
}

/// Validate, lay out and export an exam
///
/// Validation issues and failed blocks abort the export before any
/// package is produced.
pub fn export_docx_with(
    doc: &ExamDocument,
    engine: &LayoutEngine,
    options: &ExportOptions,
) -> DocxResult<Vec<u8>> {
    let plan = engine.layout(doc)?;
    export_plan_bytes(&plan, options)
}

/// Export an already computed layout plan
pub fn export_plan_bytes(plan: &LayoutPlan, options: &ExportOptions) -> DocxResult<Vec<u8>> {
    let cursor = DocxWriter::new(Cursor::new(Vec::new())).write_plan(plan, options)?;
    let bytes = cursor.into_inner();
    tracing::debug!(size = bytes.len(), "docx package assembled");
    Ok(bytes)
}

/// Export an exam to a DOCX file on disk.
///
/// The package is assembled completely in memory first; nothing is
/// written when the export fails.
pub fn export_docx(doc: &ExamDocument, path: &Path) -> DocxResult<()> {
    let bytes = export_docx_bytes(doc)?;
    write_package(&bytes, path)
}

/// Write an assembled package, creating missing parent directories
pub fn write_package(bytes: &[u8], path: &Path) -> DocxResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    tracing::info!(path = %path.display(), size = bytes.len(), "exam exported");
    Ok(())
}
