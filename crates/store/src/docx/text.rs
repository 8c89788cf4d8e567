//! Visible text extraction
//!
//! Re-reads the main document part of a package and returns the text of each
//! non-empty paragraph in reading order. Tabs come back as `\t` and line
//! breaks as `\n`, matching the plan's visible text.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::{DocxReader, XmlParser};
use quick_xml::events::Event;
use std::io::Cursor;

/// Paragraph texts of a DOCX package, in reading order
pub fn read_visible_paragraphs(bytes: &[u8]) -> DocxResult<Vec<String>> {
    let mut reader = DocxReader::new(Cursor::new(bytes))?;
    let part = reader.main_document_part()?;
    let document = reader.read_file_as_string(&part)?;
    paragraphs_from_xml(&document)
}

/// Paragraph texts of a document.xml body
pub fn paragraphs_from_xml(xml: &str) -> DocxResult<Vec<String>> {
    let mut reader = XmlParser::preserving(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut current: Option<String> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => current = Some(String::new()),
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:p" => {
                    if let Some(text) = current.take().filter(|t| !t.is_empty()) {
                        paragraphs.push(text);
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if in_run => {
                if let Some(text) = current.as_mut() {
                    match e.name().as_ref() {
                        b"w:tab" => text.push('\t'),
                        b"w:br" | b"w:cr" => text.push('\n'),
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| DocxError::XmlParse(err.to_string()))?;
                if let Some(text) = current.as_mut() {
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DocxError::from(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}
