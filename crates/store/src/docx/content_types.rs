//! `[Content_Types].xml`
//!
//! Maps package parts to MIME types. XML parts get explicit overrides;
//! logo media is covered by per-extension defaults added as images are
//! embedded.

use crate::docx::content_type_values;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use quick_xml::events::Event;
use std::collections::BTreeMap;
use std::fmt::Write;

const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Content types of a package. Output is sorted so packages are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    by_extension: BTreeMap<String, String>,
    by_part: BTreeMap<String, String>,
}

impl ContentTypes {
    /// Types with the `rels` and `xml` defaults every package needs
    pub fn new() -> Self {
        let mut types = Self::default();
        types.register_extension("rels", content_type_values::RELATIONSHIPS);
        types.register_extension("xml", content_type_values::XML);
        types
    }

    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();
        let mut types = Self::default();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let content_type = XmlParser::get_attribute(e, b"ContentType");
                    let name = e.name();
                    let key = if XmlParser::matches_element(name.as_ref(), "Default") {
                        XmlParser::get_attribute(e, b"Extension").map(|ext| (true, ext))
                    } else if XmlParser::matches_element(name.as_ref(), "Override") {
                        XmlParser::get_attribute(e, b"PartName").map(|part| (false, part))
                    } else {
                        None
                    };

                    match (key, content_type) {
                        (Some((true, ext)), Some(ct)) => types.register_extension(&ext, &ct),
                        (Some((false, part)), Some(ct)) => types.register_part(&part, &ct),
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(types)
    }

    /// Type of a part: its override, else the default for its extension
    pub fn lookup(&self, part_name: &str) -> Option<&str> {
        self.by_part
            .get(&absolute_part_name(part_name))
            .or_else(|| {
                part_name
                    .rsplit_once('.')
                    .and_then(|(_, ext)| self.by_extension.get(&ext.to_ascii_lowercase()))
            })
            .map(String::as_str)
    }

    /// Default type for an extension; extensions are case-insensitive
    pub fn register_extension(&mut self, extension: &str, content_type: &str) {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }

    /// Explicit type for one part
    pub fn register_part(&mut self, part_name: &str, content_type: &str) {
        self.by_part
            .insert(absolute_part_name(part_name), content_type.to_string());
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        let _ = write!(xml, "<Types xmlns=\"{}\">", CONTENT_TYPES_NS);
        for (ext, ct) in &self.by_extension {
            let _ = write!(xml, "<Default Extension=\"{}\" ContentType=\"{}\"/>", ext, ct);
        }
        for (part, ct) in &self.by_part {
            let _ = write!(xml, "<Override PartName=\"{}\" ContentType=\"{}\"/>", part, ct);
        }
        xml.push_str("</Types>");
        xml
    }
}

fn absolute_part_name(part_name: &str) -> String {
    format!("/{}", part_name.trim_start_matches('/'))
}

/// Content types for the parts every exam package carries
pub fn create_default_content_types() -> ContentTypes {
    let mut types = ContentTypes::new();
    types.register_part("word/document.xml", content_type_values::DOCUMENT);
    types.register_part("word/styles.xml", content_type_values::STYLES);
    types.register_part("word/settings.xml", content_type_values::SETTINGS);
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut types = create_default_content_types();
        types.register_extension("PNG", "image/png");

        assert_eq!(types.lookup("/word/document.xml"), Some(content_type_values::DOCUMENT));
        assert_eq!(types.lookup("word/styles.xml"), Some(content_type_values::STYLES));
        assert_eq!(types.lookup("customXml/item1.xml"), Some(content_type_values::XML));
        assert_eq!(types.lookup("word/media/logo_left.Png"), Some("image/png"));
        assert_eq!(types.lookup("word/media/logo_right.gif"), None);
        assert_eq!(types.lookup("README"), None);
    }

    #[test]
    fn test_parse() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="{ns}">
    <Default Extension="jpeg" ContentType="image/jpeg"/>
    <Default Extension="gif"/>
    <Override PartName="/word/header1.xml" ContentType="{header}"/>
</Types>"#,
            ns = CONTENT_TYPES_NS,
            header = content_type_values::HEADER,
        );

        let types = ContentTypes::parse(&xml).unwrap();
        assert_eq!(types.lookup("word/media/logo_left.jpeg"), Some("image/jpeg"));
        assert_eq!(types.lookup("word/media/logo_left.gif"), None);
        assert_eq!(types.lookup("word/header1.xml"), Some(content_type_values::HEADER));
    }

    #[test]
    fn test_xml_is_sorted_and_reparses() {
        let mut types = create_default_content_types();
        types.register_part("word/header1.xml", content_type_values::HEADER);
        types.register_extension("png", "image/png");
        let xml = types.to_xml();

        assert!(xml.find("Extension=\"png\"").unwrap() < xml.find("Extension=\"rels\"").unwrap());
        assert!(xml.find("/word/document.xml").unwrap() < xml.find("/word/styles.xml").unwrap());
        assert_eq!(ContentTypes::parse(&xml).unwrap(), types);
    }
}
