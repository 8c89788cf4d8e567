//! Styles.xml writer
//!
//! Generates one paragraph style per exam text role. Every size and
//! spacing is multiplied by the exam font scale, so the exported file
//! grows with the preview.

use crate::docx::namespaces;
use layout_engine::TextRole;

/// Font used for every exam style
pub const EXAM_FONT: &str = "Times New Roman";

/// Style id of a text role's paragraph style
pub fn style_id(role: TextRole) -> &'static str {
    match role {
        TextRole::SchoolName => "ExamSchool",
        TextRole::Campus => "ExamCampus",
        TextRole::ExamTitle => "ExamTitle",
        TextRole::HeaderInfo => "ExamInfo",
        TextRole::SectionHeading => "SectionHeading",
        TextRole::Instruction => "Instruction",
        TextRole::QuestionText | TextRole::MarksLabel => "Question",
        TextRole::OptionText => "Option",
        TextRole::Watermark => "Normal",
    }
}

struct StyleDef {
    role: TextRole,
    name: &'static str,
    centered: bool,
    keep_next: bool,
    keep_lines: bool,
    /// Spacing before and after in points at scale 1.0
    before: f32,
    after: f32,
}

const STYLES: &[StyleDef] = &[
    StyleDef { role: TextRole::SchoolName, name: "Exam School", centered: true, keep_next: true, keep_lines: false, before: 0.0, after: 0.0 },
    StyleDef { role: TextRole::Campus, name: "Exam Campus", centered: true, keep_next: true, keep_lines: false, before: 0.0, after: 0.0 },
    StyleDef { role: TextRole::ExamTitle, name: "Exam Title", centered: true, keep_next: true, keep_lines: false, before: 0.0, after: 4.0 },
    StyleDef { role: TextRole::HeaderInfo, name: "Exam Info", centered: false, keep_next: true, keep_lines: false, before: 0.0, after: 2.0 },
    StyleDef { role: TextRole::SectionHeading, name: "Section Heading", centered: false, keep_next: true, keep_lines: true, before: 10.0, after: 2.0 },
    StyleDef { role: TextRole::Instruction, name: "Instruction", centered: false, keep_next: true, keep_lines: true, before: 0.0, after: 6.0 },
    StyleDef { role: TextRole::QuestionText, name: "Question", centered: false, keep_next: false, keep_lines: true, before: 0.0, after: 8.0 },
    StyleDef { role: TextRole::OptionText, name: "Option", centered: false, keep_next: false, keep_lines: true, before: 0.0, after: 2.0 },
];

/// Convert points to twentieths of a point
pub fn twips(points: f32) -> i64 {
    (points as f64 * 20.0).round() as i64
}

/// Font size of a role in half-points at a font scale
pub fn half_points(role: TextRole, scale: f32) -> i64 {
    (role.base_size() as f64 * scale as f64 * 2.0).round().max(1.0) as i64
}

/// Writer for styles.xml
pub struct StylesWriter {
    scale: f32,
}

impl StylesWriter {
    pub fn new(scale: f32) -> Self {
        Self { scale }
    }

    /// Generate styles.xml content
    pub fn write(&self) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:styles xmlns:w="{}" xmlns:r="{}">"#,
            namespaces::W,
            namespaces::R,
        ));

        self.write_doc_defaults(&mut xml);
        self.write_normal(&mut xml);
        for def in STYLES {
            self.write_style(&mut xml, def);
        }

        xml.push_str("</w:styles>");
        xml
    }

    fn write_doc_defaults(&self, xml: &mut String) {
        let size = half_points(TextRole::QuestionText, self.scale);
        xml.push_str("<w:docDefaults>");
        xml.push_str("<w:rPrDefault><w:rPr>");
        xml.push_str(&format!(
            r#"<w:rFonts w:ascii="{f}" w:hAnsi="{f}" w:cs="{f}" w:eastAsia="{f}"/>"#,
            f = EXAM_FONT
        ));
        xml.push_str(&format!(r#"<w:sz w:val="{}"/><w:szCs w:val="{}"/>"#, size, size));
        xml.push_str("</w:rPr></w:rPrDefault>");
        xml.push_str("<w:pPrDefault><w:pPr>");
        xml.push_str(r#"<w:spacing w:after="0" w:line="240" w:lineRule="auto"/>"#);
        xml.push_str("</w:pPr></w:pPrDefault>");
        xml.push_str("</w:docDefaults>");
    }

    fn write_normal(&self, xml: &mut String) {
        xml.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal">"#);
        xml.push_str(r#"<w:name w:val="Normal"/><w:qFormat/>"#);
        xml.push_str("</w:style>");
    }

    fn write_style(&self, xml: &mut String, def: &StyleDef) {
        xml.push_str(&format!(
            r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{}">"#,
            style_id(def.role)
        ));
        xml.push_str(&format!(r#"<w:name w:val="{}"/>"#, def.name));
        xml.push_str(r#"<w:basedOn w:val="Normal"/>"#);
        xml.push_str(r#"<w:qFormat/>"#);

        xml.push_str("<w:pPr>");
        if def.keep_next {
            xml.push_str("<w:keepNext/>");
        }
        if def.keep_lines {
            xml.push_str("<w:keepLines/>");
        }
        xml.push_str(&format!(
            r#"<w:spacing w:before="{}" w:after="{}"/>"#,
            twips(def.before * self.scale),
            twips(def.after * self.scale)
        ));
        if def.centered {
            xml.push_str(r#"<w:jc w:val="center"/>"#);
        }
        xml.push_str("</w:pPr>");

        let size = half_points(def.role, self.scale);
        xml.push_str("<w:rPr>");
        if def.role.bold() {
            xml.push_str("<w:b/><w:bCs/>");
        }
        if def.role.italic() {
            xml.push_str("<w:i/><w:iCs/>");
        }
        xml.push_str(&format!(r#"<w:sz w:val="{}"/><w:szCs w:val="{}"/>"#, size, size));
        xml.push_str("</w:rPr>");

        xml.push_str("</w:style>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exam_styles_present() {
        let xml = StylesWriter::new(1.0).write();
        for id in [
            "ExamSchool",
            "ExamTitle",
            "ExamInfo",
            "SectionHeading",
            "Instruction",
            "Question",
            "Option",
        ] {
            assert!(xml.contains(&format!(r#"w:styleId="{}""#, id)), "missing {}", id);
        }
        assert!(xml.contains(r#"w:ascii="Times New Roman""#));
    }

    #[test]
    fn test_font_scale_applied() {
        let normal = StylesWriter::new(1.0).write();
        let doubled = StylesWriter::new(2.0).write();

        // School name is 16pt, i.e. 32 half-points
        assert!(normal.contains(r#"<w:sz w:val="32"/>"#));
        assert!(doubled.contains(r#"<w:sz w:val="64"/>"#));
        // Section heading spacing before: 10pt -> 200 twips
        assert!(normal.contains(r#"w:before="200""#));
        assert!(doubled.contains(r#"w:before="400""#));
    }

    #[test]
    fn test_half_points() {
        assert_eq!(half_points(TextRole::QuestionText, 1.0), 22);
        assert_eq!(half_points(TextRole::QuestionText, 1.5), 33);
        assert_eq!(half_points(TextRole::QuestionText, 0.0), 1);
    }

    #[test]
    fn test_style_ids() {
        assert_eq!(style_id(TextRole::MarksLabel), "Question");
        assert_eq!(style_id(TextRole::Instruction), "Instruction");
    }
}
