//! Package relationships
//!
//! `_rels/.rels` points at the main document; `word/_rels/document.xml.rels`
//! points at styles, settings, the watermark header and the logo media.
//! Every target is a part inside the package.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::XmlParser;
use crate::docx::{escape_xml, relationship_types};
use quick_xml::events::Event;
use std::fmt::Write;

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One `<Relationship>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// `rIdN`, unique within its rels part
    pub id: String,
    pub rel_type: String,
    /// Target path relative to the source part
    pub target: String,
}

/// The entries of one rels part, in the order they were added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
    next_id: u32,
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new()
    }
}

impl Relationships {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Read a rels part. New ids continue after the highest `rIdN` found.
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();
        let mut rels = Self::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if XmlParser::matches_element(e.name().as_ref(), "Relationship") =>
                {
                    let required = |attr: &str| {
                        XmlParser::get_attribute(e, attr.as_bytes())
                            .ok_or_else(|| DocxError::XmlParse(format!("Relationship without {}", attr)))
                    };
                    let entry = Relationship {
                        id: required("Id")?,
                        rel_type: required("Type")?,
                        target: required("Target")?,
                    };

                    let number = entry.id.strip_prefix("rId").and_then(|n| n.parse::<u32>().ok());
                    if let Some(number) = number {
                        rels.next_id = rels.next_id.max(number + 1);
                    }
                    rels.entries.push(entry);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Append an entry and return its id
    pub fn add(&mut self, rel_type: &str, target: &str) -> String {
        let id = format!("rId{}", self.next_id);
        self.next_id += 1;
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
        });
        id
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Entries of one relationship type
    pub fn of_type<'a>(&'a self, rel_type: &'a str) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.entries.iter().filter(move |r| r.rel_type == rel_type)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        let _ = write!(xml, "<Relationships xmlns=\"{}\">", RELATIONSHIPS_NS);
        for rel in &self.entries {
            let _ = write!(
                xml,
                "<Relationship Id=\"{}\" Type=\"{}\" Target=\"{}\"/>",
                rel.id,
                rel.rel_type,
                escape_xml(&rel.target)
            );
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// `_rels/.rels`
pub fn create_root_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::DOCUMENT, "word/document.xml");
    rels
}

/// `word/_rels/document.xml.rels` before media and headers are added
pub fn create_document_rels() -> Relationships {
    let mut rels = Relationships::new();
    rels.add(relationship_types::STYLES, "styles.xml");
    rels.add(relationship_types::SETTINGS, "settings.xml");
    rels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_continues_ids() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{ns}">
    <Relationship Id="rId1" Type="{styles}" Target="styles.xml"/>
    <Relationship Id="rId4" Type="{image}" Target="media/logo_left.png"/>
</Relationships>"#,
            ns = RELATIONSHIPS_NS,
            styles = relationship_types::STYLES,
            image = relationship_types::IMAGE,
        );

        let mut rels = Relationships::parse(&xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels.get("rId4").unwrap().target, "media/logo_left.png");
        assert_eq!(rels.add(relationship_types::HEADER, "header1.xml"), "rId5");
    }

    #[test]
    fn test_missing_attribute() {
        let xml = r#"<Relationships><Relationship Id="rId1" Target="x.xml"/></Relationships>"#;
        match Relationships::parse(xml) {
            Err(DocxError::XmlParse(message)) => assert!(message.contains("Type")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_document_rels_with_logos() {
        let mut rels = create_document_rels();
        assert_eq!(rels.add(relationship_types::IMAGE, "media/logo_left.png"), "rId3");
        assert_eq!(rels.add(relationship_types::IMAGE, "media/logo_right.jpeg"), "rId4");

        let images: Vec<_> = rels.of_type(relationship_types::IMAGE).map(|r| r.target.as_str()).collect();
        assert_eq!(images, vec!["media/logo_left.png", "media/logo_right.jpeg"]);
        assert_eq!(rels.of_type(relationship_types::SETTINGS).count(), 1);
    }

    #[test]
    fn test_xml_reparses_in_order() {
        let rels = create_document_rels();
        let xml = rels.to_xml();
        assert!(xml.find("styles.xml").unwrap() < xml.find("settings.xml").unwrap());
        assert_eq!(Relationships::parse(&xml).unwrap(), rels);
    }
}
