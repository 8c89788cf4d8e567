//! Document.xml writer
//!
//! Converts a layout plan to DOCX document.xml. Paragraph texts are copied
//! from the plan blocks: numbers, marks labels and option letters are never
//! recomputed here.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::media_writer::generate_inline_drawing;
use crate::docx::namespaces;
use crate::docx::styles_writer::{style_id, twips};
use crate::docx::escape_xml;
use crate::settings::PaginationMode;
use doc_model::LogoSide;
use layout_engine::{
    BlockContent, HeaderBlock, InfoField, LayoutPlan, PlanBlock, QuestionBlock, SectionLead,
    TextRole,
};

/// Width of the number column of question paragraphs at scale 1.0
const NUMBER_COLUMN: f32 = 24.0;
/// Gap between a logo and the school lines at scale 1.0
const LOGO_GAP: f32 = 8.0;
/// Distance of the page header from the top edge, in twips
const HEADER_DISTANCE: i64 = 360;

/// An embedded logo referenced from the header table
#[derive(Debug, Clone, PartialEq)]
pub struct LogoDrawing {
    pub side: LogoSide,
    pub rel_id: String,
    pub width_emu: i64,
    pub height_emu: i64,
    pub name: String,
}

#[derive(Debug, Clone, Copy)]
enum TabKind {
    Left,
    Center,
    Right,
}

impl TabKind {
    fn as_str(&self) -> &'static str {
        match self {
            TabKind::Left => "left",
            TabKind::Center => "center",
            TabKind::Right => "right",
        }
    }
}

/// Direct paragraph properties on top of the paragraph style
#[derive(Debug, Default)]
struct ParagraphProps {
    keep_next: bool,
    keep_lines: bool,
    page_break_before: bool,
    bottom_rule: bool,
    tabs: Vec<(TabKind, i64)>,
    /// Left indent and hanging indent in twips
    hanging: Option<(i64, i64)>,
}

/// Writer for document.xml
pub struct DocumentWriter<'a> {
    plan: &'a LayoutPlan,
    pagination: PaginationMode,
    logos: Vec<LogoDrawing>,
    header_reference: Option<String>,
    next_drawing_id: u32,
    /// Whether the last body element written was a table
    ends_with_table: bool,
}

impl<'a> DocumentWriter<'a> {
    pub fn new(plan: &'a LayoutPlan, pagination: PaginationMode) -> Self {
        Self {
            plan,
            pagination,
            logos: Vec::new(),
            header_reference: None,
            next_drawing_id: 1,
            ends_with_table: false,
        }
    }

    /// Logos that were embedded in the package
    pub fn with_logos(mut self, logos: Vec<LogoDrawing>) -> Self {
        self.logos = logos;
        self
    }

    /// Relationship id of the default page header
    pub fn with_header_reference(mut self, rel_id: Option<String>) -> Self {
        self.header_reference = rel_id;
        self
    }

    /// Generate document.xml content
    pub fn write(mut self) -> DocxResult<String> {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:document xmlns:w="{}" xmlns:r="{}" xmlns:wp="{}" xmlns:a="{}" xmlns:pic="{}">"#,
            namespaces::W,
            namespaces::R,
            namespaces::WP,
            namespaces::A,
            namespaces::PIC,
        ));
        xml.push_str("<w:body>");

        let plan = self.plan;
        for page in &plan.pages {
            for (i, block) in page.blocks.iter().enumerate() {
                let page_break = self.pagination == PaginationMode::Planned && page.index > 0 && i == 0;
                self.write_block(&mut xml, block, page_break)?;
            }
        }

        if self.ends_with_table {
            // A body may not end with a table
            xml.push_str("<w:p/>");
        }
        self.write_section_properties(&mut xml);

        xml.push_str("</w:body>");
        xml.push_str("</w:document>");
        Ok(xml)
    }

    fn scale(&self) -> f32 {
        self.plan.font_scale
    }

    fn content_width(&self) -> i64 {
        twips(self.plan.page_config.content_width())
    }

    fn write_block(&mut self, xml: &mut String, block: &PlanBlock, page_break: bool) -> DocxResult<()> {
        match &block.content {
            BlockContent::Header(header) => self.write_header(xml, block, header),
            BlockContent::SectionLead(lead) => self.write_lead(xml, lead, page_break),
            BlockContent::Question(question) => self.write_question(xml, question, page_break),
            BlockContent::Failed(failed) => {
                return Err(DocxError::BlockFailed {
                    bucket: failed.bucket,
                    number: failed.number,
                    message: failed.message.clone(),
                })
            }
        }
        Ok(())
    }

    fn write_header(&mut self, xml: &mut String, block: &PlanBlock, header: &HeaderBlock) {
        let titles = header.title_lines();
        let has_logos = header.logo_left.is_some() || header.logo_right.is_some();

        if has_logos {
            self.write_header_table(xml, block, &titles);
        } else {
            for (role, text) in &titles {
                write_paragraph(xml, style_id(*role), &ParagraphProps::default(), text);
            }
        }

        let width = self.content_width();
        let last = header.info_rows.len().saturating_sub(1);
        for (i, row) in header.info_rows.iter().enumerate() {
            let props = ParagraphProps {
                keep_next: true,
                bottom_rule: i == last,
                tabs: info_tabs(row, width),
                ..Default::default()
            };
            write_paragraph(xml, style_id(TextRole::HeaderInfo), &props, &HeaderBlock::info_row_text(row));
        }
        self.ends_with_table = false;
    }

    /// Three-column table: left logo, school lines, right logo
    fn write_header_table(&mut self, xml: &mut String, block: &PlanBlock, titles: &[(TextRole, &str)]) {
        let logo_box = block
            .images
            .iter()
            .map(|i| i.bounds.width)
            .fold(0.0f32, f32::max);
        let side = twips(logo_box + LOGO_GAP * self.scale());
        let middle = (self.content_width() - 2 * side).max(0);

        xml.push_str("<w:tbl><w:tblPr>");
        xml.push_str(&format!(r#"<w:tblW w:w="{}" w:type="dxa"/>"#, self.content_width()));
        write_no_borders(xml);
        xml.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
        xml.push_str(r#"<w:tblCellMar><w:left w:w="0" w:type="dxa"/><w:right w:w="0" w:type="dxa"/></w:tblCellMar>"#);
        xml.push_str(r#"<w:tblLook w:val="0000"/>"#);
        xml.push_str("</w:tblPr>");
        xml.push_str(&format!(
            r#"<w:tblGrid><w:gridCol w:w="{s}"/><w:gridCol w:w="{m}"/><w:gridCol w:w="{s}"/></w:tblGrid>"#,
            s = side,
            m = middle
        ));
        xml.push_str(r#"<w:tr><w:trPr><w:cantSplit/></w:trPr>"#);

        self.write_logo_cell(xml, LogoSide::Left, side);

        start_cell(xml, middle);
        if titles.is_empty() {
            xml.push_str("<w:p/>");
        }
        for (role, text) in titles {
            write_paragraph(xml, style_id(*role), &ParagraphProps::default(), text);
        }
        xml.push_str("</w:tc>");

        self.write_logo_cell(xml, LogoSide::Right, side);

        xml.push_str("</w:tr></w:tbl>");
    }

    fn write_logo_cell(&mut self, xml: &mut String, side: LogoSide, width: i64) {
        start_cell(xml, width);
        let logo = self.logos.iter().find(|l| l.side == side).cloned();
        match logo {
            Some(logo) => {
                let jc = match side {
                    LogoSide::Left => "left",
                    LogoSide::Right => "right",
                };
                xml.push_str(&format!(r#"<w:p><w:pPr><w:jc w:val="{}"/></w:pPr><w:r>"#, jc));
                let id = self.next_drawing_id;
                self.next_drawing_id += 1;
                let alt = match side {
                    LogoSide::Left => "Left logo",
                    LogoSide::Right => "Right logo",
                };
                xml.push_str(&generate_inline_drawing(
                    id,
                    &logo.rel_id,
                    logo.width_emu,
                    logo.height_emu,
                    &logo.name,
                    Some(alt),
                ));
                xml.push_str("</w:r></w:p>");
            }
            None => xml.push_str("<w:p/>"),
        }
        xml.push_str("</w:tc>");
    }

    fn write_lead(&mut self, xml: &mut String, lead: &SectionLead, page_break: bool) {
        let heading = ParagraphProps {
            keep_next: true,
            keep_lines: true,
            page_break_before: page_break,
            tabs: vec![(TabKind::Right, self.content_width())],
            ..Default::default()
        };
        write_paragraph(xml, style_id(TextRole::SectionHeading), &heading, &lead.heading_text());

        if let Some(instruction) = &lead.instruction {
            let props = ParagraphProps {
                keep_next: true,
                keep_lines: true,
                ..Default::default()
            };
            write_paragraph(xml, style_id(TextRole::Instruction), &props, instruction);
        }
        self.ends_with_table = false;
    }

    fn write_question(&mut self, xml: &mut String, question: &QuestionBlock, page_break: bool) {
        let indent = twips(NUMBER_COLUMN * self.scale());
        let rows = question.option_rows();

        let props = ParagraphProps {
            keep_next: !rows.is_empty(),
            keep_lines: true,
            page_break_before: page_break,
            tabs: vec![(TabKind::Left, indent), (TabKind::Right, self.content_width())],
            hanging: Some((indent, indent)),
            ..Default::default()
        };
        write_paragraph(xml, style_id(TextRole::QuestionText), &props, &question.line_text());

        if rows.is_empty() {
            self.ends_with_table = false;
            return;
        }

        let columns = question.option_columns.max(1);
        let table_width = (self.content_width() - indent).max(0);
        let column_width = table_width / columns as i64;

        xml.push_str("<w:tbl><w:tblPr>");
        xml.push_str(&format!(r#"<w:tblW w:w="{}" w:type="dxa"/>"#, table_width));
        xml.push_str(&format!(r#"<w:tblInd w:w="{}" w:type="dxa"/>"#, indent));
        write_no_borders(xml);
        xml.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
        xml.push_str(r#"<w:tblLook w:val="0000"/>"#);
        xml.push_str("</w:tblPr><w:tblGrid>");
        for _ in 0..columns {
            xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, column_width));
        }
        xml.push_str("</w:tblGrid>");

        let last_row = rows.len() - 1;
        for (r, row) in rows.iter().enumerate() {
            xml.push_str(r#"<w:tr><w:trPr><w:cantSplit/></w:trPr>"#);
            for c in 0..columns {
                start_cell(xml, column_width);
                match row.get(c) {
                    Some(option) => {
                        let props = ParagraphProps {
                            // Rows of one question stay together
                            keep_next: r < last_row,
                            keep_lines: true,
                            ..Default::default()
                        };
                        write_paragraph(xml, style_id(TextRole::OptionText), &props, &option.display_text());
                    }
                    None => xml.push_str("<w:p/>"),
                }
                xml.push_str("</w:tc>");
            }
            xml.push_str("</w:tr>");
        }
        xml.push_str("</w:tbl>");
        self.ends_with_table = true;
    }

    fn write_section_properties(&self, xml: &mut String) {
        let config = &self.plan.page_config;
        xml.push_str("<w:sectPr>");
        if let Some(rel_id) = &self.header_reference {
            xml.push_str(&format!(r#"<w:headerReference w:type="default" r:id="{}"/>"#, rel_id));
        }
        xml.push_str(&format!(
            r#"<w:pgSz w:w="{}" w:h="{}"/>"#,
            twips(config.page_width()),
            twips(config.page_height())
        ));
        xml.push_str(&format!(
            r#"<w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="{h}" w:footer="{h}" w:gutter="0"/>"#,
            twips(config.margin_top),
            twips(config.margin_right),
            twips(config.margin_bottom),
            twips(config.margin_left),
            h = HEADER_DISTANCE,
        ));
        if let Some(border) = self.plan.decorations().border {
            // Border widths are in eighths of a point, spacing in points
            let size = ((border.width as f64) * 8.0).round().clamp(2.0, 96.0) as i64;
            let space = (config.border_inset.round() as i64).clamp(0, 31);
            xml.push_str(r#"<w:pgBorders w:offsetFrom="page">"#);
            for edge in ["top", "left", "bottom", "right"] {
                xml.push_str(&format!(
                    r#"<w:{} w:val="single" w:sz="{}" w:space="{}" w:color="000000"/>"#,
                    edge, size, space
                ));
            }
            xml.push_str("</w:pgBorders>");
        }
        xml.push_str("</w:sectPr>");
    }
}

/// Tab stops spreading the fields of an info row across the line
fn info_tabs(row: &[InfoField], width: i64) -> Vec<(TabKind, i64)> {
    match row.len() {
        0 | 1 => Vec::new(),
        2 => vec![(TabKind::Right, width)],
        3 => vec![(TabKind::Center, width / 2), (TabKind::Right, width)],
        n => (1..n)
            .map(|i| (TabKind::Left, width * i as i64 / n as i64))
            .collect(),
    }
}

fn start_cell(xml: &mut String, width: i64) {
    xml.push_str(&format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{}" w:type="dxa"/><w:vAlign w:val="center"/></w:tcPr>"#,
        width
    ));
}

fn write_no_borders(xml: &mut String) {
    xml.push_str("<w:tblBorders>");
    for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
        xml.push_str(&format!(r#"<w:{} w:val="nil"/>"#, edge));
    }
    xml.push_str("</w:tblBorders>");
}

/// Write a paragraph with one run holding the text
fn write_paragraph(xml: &mut String, style: &str, props: &ParagraphProps, text: &str) {
    xml.push_str("<w:p>");
    write_paragraph_properties(xml, style, props);
    write_run(xml, text);
    xml.push_str("</w:p>");
}

fn write_paragraph_properties(xml: &mut String, style: &str, props: &ParagraphProps) {
    xml.push_str("<w:pPr>");
    xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, style));
    if props.keep_next {
        xml.push_str("<w:keepNext/>");
    }
    if props.keep_lines {
        xml.push_str("<w:keepLines/>");
    }
    if props.page_break_before {
        xml.push_str("<w:pageBreakBefore/>");
    }
    if props.bottom_rule {
        xml.push_str(r#"<w:pBdr><w:bottom w:val="single" w:sz="8" w:space="4" w:color="000000"/></w:pBdr>"#);
    }
    if !props.tabs.is_empty() {
        xml.push_str("<w:tabs>");
        for (kind, pos) in &props.tabs {
            xml.push_str(&format!(r#"<w:tab w:val="{}" w:pos="{}"/>"#, kind.as_str(), pos));
        }
        xml.push_str("</w:tabs>");
    }
    if let Some((left, hanging)) = props.hanging {
        xml.push_str(&format!(r#"<w:ind w:left="{}" w:hanging="{}"/>"#, left, hanging));
    }
    xml.push_str("</w:pPr>");
}

/// Write a run, turning tabs into `w:tab` and newlines into `w:br`
fn write_run(xml: &mut String, text: &str) {
    xml.push_str("<w:r>");
    let text = text.replace("\r\n", "\n");
    for (li, line) in text.split('\n').enumerate() {
        if li > 0 {
            xml.push_str("<w:br/>");
        }
        for (ti, segment) in line.split('\t').enumerate() {
            if ti > 0 {
                xml.push_str("<w:tab/>");
            }
            if !segment.is_empty() {
                xml.push_str(r#"<w:t xml:space="preserve">"#);
                xml.push_str(&escape_xml(segment));
                xml.push_str("</w:t>");
            }
        }
    }
    xml.push_str("</w:r>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{ExamDocument, ImageSource};
    use layout_engine::LayoutEngine;

    fn plan(doc: &ExamDocument) -> LayoutPlan {
        LayoutEngine::default().layout(doc).unwrap()
    }

    #[test]
    fn test_write_run_tabs_and_breaks() {
        let mut xml = String::new();
        write_run(&mut xml, "1.\tWhat is\nH₂O?\t(2)");
        assert_eq!(
            xml,
            concat!(
                r#"<w:r><w:t xml:space="preserve">1.</w:t><w:tab/>"#,
                r#"<w:t xml:space="preserve">What is</w:t><w:br/>"#,
                r#"<w:t xml:space="preserve">H₂O?</w:t><w:tab/>"#,
                r#"<w:t xml:space="preserve">(2)</w:t></w:r>"#,
            )
        );
    }

    #[test]
    fn test_question_paragraphs_keep_together() {
        let xml = DocumentWriter::new(&plan(&ExamDocument::default_template()), PaginationMode::Flow)
            .write()
            .unwrap();

        assert!(xml.contains(r#"<w:pStyle w:val="Question"/><w:keepNext/><w:keepLines/>"#));
        assert!(xml.contains("<w:cantSplit/>"));
        assert!(xml.contains(r#"<w:pStyle w:val="Instruction"/><w:keepNext/>"#));
        assert!(!xml.contains("<w:pageBreakBefore/>"));
        assert!(xml.contains("(A) 3.01 × 10²³"));
    }

    #[test]
    fn test_planned_page_breaks() {
        let mut doc = ExamDocument::default_template();
        doc.settings.font_scale = 2.0;
        let plan = plan(&doc);
        assert!(plan.page_count() > 1);

        let xml = DocumentWriter::new(&plan, PaginationMode::Planned).write().unwrap();
        assert_eq!(xml.matches("<w:pageBreakBefore/>").count(), plan.page_count() - 1);
    }

    #[test]
    fn test_section_properties() {
        let mut doc = ExamDocument::default_template();
        doc.settings.show_border = true;
        let plan = plan(&doc);
        let xml = DocumentWriter::new(&plan, PaginationMode::Planned)
            .with_header_reference(Some("rId9".into()))
            .write()
            .unwrap();

        assert!(xml.contains(r#"<w:headerReference w:type="default" r:id="rId9"/>"#));
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains(r#"<w:top w:val="single" w:sz="12" w:space="24" w:color="000000"/>"#));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }

    #[test]
    fn test_no_border_without_setting() {
        let xml = DocumentWriter::new(&plan(&ExamDocument::default_template()), PaginationMode::Planned)
            .write()
            .unwrap();
        assert!(!xml.contains("w:pgBorders"));
        assert!(!xml.contains("w:headerReference"));
    }

    #[test]
    fn test_header_table_with_logo() {
        let mut doc = ExamDocument::default_template();
        doc.header.logo_left = Some(ImageSource::from_bytes("image/png", &[0x89, 0x50, 0x4E, 0x47]));
        let plan = plan(&doc);
        let logos = vec![LogoDrawing {
            side: LogoSide::Left,
            rel_id: "rId3".into(),
            width_emu: 711200,
            height_emu: 711200,
            name: "logo_left.png".into(),
        }];
        let xml = DocumentWriter::new(&plan, PaginationMode::Planned)
            .with_logos(logos)
            .write()
            .unwrap();

        assert!(xml.starts_with(r#"<?xml"#));
        assert!(xml.contains(r#"<w:tbl><w:tblPr>"#));
        assert_eq!(xml.matches("<w:drawing>").count(), 1);
        assert!(xml.contains(r#"r:embed="rId3""#));
    }

    #[test]
    fn test_failed_block_aborts() {
        let mut doc = ExamDocument::default_template();
        doc.mcqs[1].options = (0..27).map(|i| format!("option {}", i)).collect();
        let plan = plan(&doc);

        let err = DocumentWriter::new(&plan, PaginationMode::Planned).write().unwrap_err();
        assert!(matches!(err, DocxError::BlockFailed { number: 2, .. }));
    }

    #[test]
    fn test_info_tabs() {
        assert!(info_tabs(&[], 1000).is_empty());
        let field = || InfoField {
            label: "Date".into(),
            value: "1".into(),
        };
        assert_eq!(info_tabs(&[field(), field()], 1000).len(), 1);
        assert_eq!(info_tabs(&[field(), field(), field()], 1000)[0].1, 500);
    }
}
