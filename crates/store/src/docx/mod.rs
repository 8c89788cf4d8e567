//! DOCX Export Module
//!
//! Writes a laid-out exam as a Microsoft Word DOCX package. DOCX is based on
//! the Office Open XML (OOXML) format defined in ECMA-376.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML files:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships
//! - `word/document.xml` - Exam header, sections and questions
//! - `word/styles.xml` - Paragraph styles scaled by the exam font scale
//! - `word/settings.xml` - Compatibility settings
//! - `word/header1.xml` - Watermark, present only when one is set
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `word/media/` - Embedded logo images
//!
//! Every paragraph text is copied from the layout plan, so numbering and
//! option letters in the file are exactly those of the preview.

mod error;
mod reader;
mod content_types;
mod relationships;
mod options;
mod writer;
mod document_writer;
mod styles_writer;
mod header_writer;
mod media_writer;
mod text;
mod filename;
mod api;

pub use error::{DocxError, DocxResult};
pub use reader::{DocxReader, XmlParser};
pub use content_types::{create_default_content_types, ContentTypes};
pub use relationships::{Relationship, Relationships};
pub use options::ExportOptions;
pub use writer::DocxWriter;
pub use media_writer::{EmbeddedImage, ImageFormat, MediaWriter};
pub use text::read_visible_paragraphs;
pub use filename::docx_filename;
pub use api::{export_docx, export_docx_bytes, export_docx_with, export_plan_bytes, write_package};

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// DrawingML namespace
    pub const A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
    /// WordprocessingML Drawing namespace
    pub const WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
    /// Picture namespace
    pub const PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
    /// VML namespace
    pub const V: &str = "urn:schemas-microsoft-com:vml";
    /// Office VML extensions
    pub const O: &str = "urn:schemas-microsoft-com:office:office";
    /// Word VML extensions
    pub const W10: &str = "urn:schemas-microsoft-com:office:word";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const SETTINGS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const SETTINGS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
    pub const HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
}

/// Escape special XML characters.
///
/// Characters XML 1.0 cannot carry are dropped.
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            _ => out.push(c),
        }
    }
    out
}
