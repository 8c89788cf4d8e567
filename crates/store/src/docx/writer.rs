//! DOCX Writer Infrastructure
//!
//! Creates ZIP archives with correct DOCX structure.

use crate::docx::content_type_values;
use crate::docx::content_types::{create_default_content_types, ContentTypes};
use crate::docx::document_writer::{DocumentWriter, LogoDrawing};
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::header_writer::{HeaderWriter, WATERMARK_HEADER};
use crate::docx::media_writer::MediaWriter;
use crate::docx::options::ExportOptions;
use crate::docx::relationship_types;
use crate::docx::relationships::{create_document_rels, create_root_rels, Relationships};
use crate::docx::styles_writer::StylesWriter;
use layout_engine::{BlockContent, LayoutPlan};
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Main DOCX writer
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    content_types: ContentTypes,
    root_rels: Relationships,
    doc_rels: Relationships,
}

impl<W: Write + Seek> DocxWriter<W> {
    /// Create a new DOCX writer
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            content_types: create_default_content_types(),
            root_rels: create_root_rels(),
            doc_rels: create_document_rels(),
        }
    }

    /// Write a complete DOCX package from a layout plan.
    ///
    /// Fails without writing the document part when the plan holds a
    /// failed block. Returns the underlying writer once the archive is
    /// finished.
    pub fn write_plan(mut self, plan: &LayoutPlan, options: &ExportOptions) -> DocxResult<W> {
        if let Some(failed) = plan.failures().first() {
            return Err(DocxError::BlockFailed {
                bucket: failed.bucket,
                number: failed.number,
                message: failed.message.clone(),
            });
        }

        let logos = self.write_media(plan, options)?;

        let header_reference = match plan.decorations().watermark {
            Some(text) => {
                let header_xml = HeaderWriter::new(&text, plan.page_config.content_width()).write();
                self.write_file(&format!("word/{}", WATERMARK_HEADER), &header_xml)?;
                self.content_types
                    .register_part(&format!("word/{}", WATERMARK_HEADER), content_type_values::HEADER);
                Some(self.doc_rels.add(relationship_types::HEADER, WATERMARK_HEADER))
            }
            None => None,
        };

        tracing::debug!(
            pages = plan.page_count(),
            logos = logos.len(),
            watermark = header_reference.is_some(),
            pagination = ?options.pagination,
            "writing docx package"
        );

        let doc_xml = DocumentWriter::new(plan, options.pagination)
            .with_logos(logos)
            .with_header_reference(header_reference)
            .write()?;
        self.write_file("word/document.xml", &doc_xml)?;

        let styles_xml = StylesWriter::new(plan.font_scale).write();
        self.write_file("word/styles.xml", &styles_xml)?;

        self.write_file("word/settings.xml", &generate_settings_xml())?;

        let root_rels_xml = self.root_rels.to_xml();
        self.write_file("_rels/.rels", &root_rels_xml)?;

        let doc_rels_xml = self.doc_rels.to_xml();
        self.write_file("word/_rels/document.xml.rels", &doc_rels_xml)?;

        // Write [Content_Types].xml last, once every part is known
        let content_types_xml = self.content_types.to_xml();
        self.write_file("[Content_Types].xml", &content_types_xml)?;

        Ok(self.zip.finish()?)
    }

    /// Embed the header logos and return their drawing references
    fn write_media(&mut self, plan: &LayoutPlan, options: &ExportOptions) -> DocxResult<Vec<LogoDrawing>> {
        let Some(block) = plan
            .blocks()
            .find(|b| matches!(b.content, BlockContent::Header(_)))
        else {
            return Ok(Vec::new());
        };
        let BlockContent::Header(header) = &block.content else {
            return Ok(Vec::new());
        };

        let boxes: Vec<_> = block.images.iter().map(|i| (i.side, i.bounds)).collect();
        let images = MediaWriter::new(options.max_image_bytes).collect(header, &boxes);

        let mut drawings = Vec::with_capacity(images.len());
        for image in images {
            let name = image.file_name();
            self.write_binary(&format!("word/media/{}", name), &image.data)?;
            self.content_types
                .register_extension(image.format.extension(), image.format.mime_type());
            let rel_id = self.doc_rels.add(relationship_types::IMAGE, &format!("media/{}", name));
            drawings.push(LogoDrawing {
                side: image.side,
                rel_id,
                width_emu: image.width_emu,
                height_emu: image.height_emu,
                name,
            });
        }
        Ok(drawings)
    }

    /// Write a file to the ZIP archive
    pub fn write_file(&mut self, path: &str, content: &str) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;

        Ok(())
    }

    /// Write binary data to the ZIP archive
    pub fn write_binary(&mut self, path: &str, data: &[u8]) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored); // Don't compress binary

        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;

        Ok(())
    }
}

/// Generate a minimal settings.xml
pub fn generate_settings_xml() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:defaultTabStop w:val="720"/>
    <w:characterSpacingControl w:val="doNotCompress"/>
    <w:compat>
        <w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/>
    </w:compat>
</w:settings>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::reader::DocxReader;
    use crate::settings::PaginationMode;
    use doc_model::ExamDocument;
    use layout_engine::LayoutEngine;
    use std::io::Cursor;

    fn write(doc: &ExamDocument, options: &ExportOptions) -> Vec<u8> {
        let plan = LayoutEngine::default().layout(doc).unwrap();
        DocxWriter::new(Cursor::new(Vec::new()))
            .write_plan(&plan, options)
            .unwrap()
            .into_inner()
    }

    #[test]
    fn test_package_parts() {
        let bytes = write(&ExamDocument::default_template(), &ExportOptions::default());
        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();

        assert_eq!(reader.main_document_part().unwrap(), "word/document.xml");
        assert_eq!(
            reader.file_names(),
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/_rels/document.xml.rels",
                "word/document.xml",
                "word/settings.xml",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_watermark_adds_header_part() {
        let mut doc = ExamDocument::default_template();
        doc.settings.watermark_text = "CONFIDENTIAL".into();
        let bytes = write(&doc, &ExportOptions::default().with_pagination(PaginationMode::Flow));
        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();

        let header = reader.read_file_as_string("word/header1.xml").unwrap();
        assert!(header.contains(r#"string="CONFIDENTIAL""#));

        let rels = Relationships::parse(&reader.read_file_as_string("word/_rels/document.xml.rels").unwrap()).unwrap();
        let header_rel = rels.of_type(relationship_types::HEADER).next().unwrap();
        let document = reader.read_file_as_string("word/document.xml").unwrap();
        assert!(document.contains(&format!(r#"r:id="{}""#, header_rel.id)));

        let types = ContentTypes::parse(&reader.read_file_as_string("[Content_Types].xml").unwrap()).unwrap();
        assert_eq!(
            types.lookup("word/header1.xml"),
            Some(content_type_values::HEADER)
        );
    }

    #[test]
    fn test_generate_settings() {
        let settings = generate_settings_xml();
        assert!(settings.contains("w:settings"));
        assert!(settings.contains("compatibilityMode"));
    }
}
