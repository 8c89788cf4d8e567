//! ZIP archive reading and XML parsing utilities
//!
//! Used to inspect exported packages: tests and the parity check re-open
//! the archive the writer produced.

use crate::docx::content_types::ContentTypes;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::relationships::Relationships;
use crate::docx::{content_type_values, relationship_types};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> DocxResult<Self> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a file from the archive as a string
    pub fn read_file_as_string(&mut self, path: &str) -> DocxResult<String> {
        let bytes = self.read_file_as_bytes(path)?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Read a file from the archive as bytes
    pub fn read_file_as_bytes(&mut self, path: &str) -> DocxResult<Vec<u8>> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                DocxError::MissingPart(path.to_string())
            } else {
                DocxError::from(e)
            }
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        Ok(contents)
    }

    /// Check if a file exists in the archive
    pub fn file_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// Get a sorted list of all files in the archive
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    /// Locate the main document part.
    ///
    /// Follows the `officeDocument` relationship in `_rels/.rels` and
    /// requires `[Content_Types].xml` to declare the target as a
    /// WordprocessingML document.
    pub fn main_document_part(&mut self) -> DocxResult<String> {
        let rels = Relationships::parse(&self.read_file_as_string("_rels/.rels")?)?;
        let part = rels
            .of_type(relationship_types::DOCUMENT)
            .next()
            .map(|rel| rel.target.trim_start_matches('/').to_string())
            .ok_or_else(|| DocxError::InvalidPackage("no officeDocument relationship".into()))?;

        let types = ContentTypes::parse(&self.read_file_as_string("[Content_Types].xml")?)?;
        match types.lookup(&part) {
            Some(content_type) if content_type == content_type_values::DOCUMENT => Ok(part),
            other => Err(DocxError::InvalidPackage(format!(
                "{} has content type {}",
                part,
                other.unwrap_or("none")
            ))),
        }
    }
}

/// XML reader utilities for parsing DOCX XML content
pub struct XmlParser;

impl XmlParser {
    /// Create a new XML reader from a string, skipping whitespace-only text
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader
    }

    /// Create a reader that keeps text exactly as written
    pub fn preserving(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);
        reader
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &quick_xml::events::BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| String::from_utf8_lossy(&a.value).to_string())
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected
            || name_str
                .strip_suffix(expected)
                .is_some_and(|prefix| prefix.ends_with(':'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;

    #[test]
    fn test_matches_element() {
        assert!(XmlParser::matches_element(b"p", "p"));
        assert!(XmlParser::matches_element(b"w:p", "p"));
        assert!(!XmlParser::matches_element(b"w:r", "p"));
        assert!(!XmlParser::matches_element(b"w:bdp", "p"));
    }

    #[test]
    fn test_get_attribute() {
        let xml = r#"<Override PartName="/word/document.xml" ContentType="text/plain"/>"#;
        let mut reader = XmlParser::from_string(xml);
        let mut buf = Vec::new();
        match reader.read_event_into(&mut buf).unwrap() {
            Event::Empty(e) => {
                assert_eq!(XmlParser::get_attribute(&e, b"PartName").as_deref(), Some("/word/document.xml"));
                assert_eq!(XmlParser::get_attribute(&e, b"Extension"), None);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxReader::new(std::io::Cursor::new(b"plain text".to_vec()));
        assert!(matches!(result, Err(DocxError::Zip(_))));
    }
}
