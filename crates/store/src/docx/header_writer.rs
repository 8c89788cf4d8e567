//! Header part writer
//!
//! The watermark lives in the default page header as a VML text-path
//! shape, which Word repeats behind the body of every page.

use crate::docx::namespaces;
use crate::docx::escape_xml;

/// Part name of the watermark header inside `word/`
pub const WATERMARK_HEADER: &str = "header1.xml";

/// Writer for header1.xml
pub struct HeaderWriter<'a> {
    watermark: &'a str,
    /// Width of the watermark shape in points
    width: f32,
}

impl<'a> HeaderWriter<'a> {
    pub fn new(watermark: &'a str, content_width: f32) -> Self {
        Self {
            watermark,
            width: content_width,
        }
    }

    /// Generate the header part XML
    pub fn write(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<w:hdr xmlns:w="{}" xmlns:r="{}" xmlns:v="{}" xmlns:o="{}" xmlns:w10="{}">"#,
            namespaces::W,
            namespaces::R,
            namespaces::V,
            namespaces::O,
            namespaces::W10,
        ));
        xml.push_str("<w:p><w:r><w:pict>");
        xml.push_str(TEXT_PATH_SHAPETYPE);
        xml.push_str(&format!(
            concat!(
                r##"<v:shape id="ExamWatermark" o:spid="_x0000_s2049" type="#_x0000_t136" "##,
                r#"style="position:absolute;margin-left:0;margin-top:0;width:{w:.1}pt;height:{h:.1}pt;"#,
                r#"rotation:315;z-index:-251657216;"#,
                r#"mso-position-horizontal:center;mso-position-horizontal-relative:margin;"#,
                r#"mso-position-vertical:center;mso-position-vertical-relative:margin" "#,
                r#"o:allowincell="f" fillcolor="silver" stroked="f">"#,
                r#"<v:fill opacity=".25"/>"#,
                r#"<v:textpath style="font-family:&quot;Times New Roman&quot;;font-size:1pt;font-weight:bold" string="{text}"/>"#,
                r#"<w10:wrap anchorx="margin" anchory="margin"/>"#,
                r#"</v:shape>"#,
            ),
            w = self.width,
            h = self.width / 4.0,
            text = escape_xml(self.watermark),
        ));
        xml.push_str("</w:pict></w:r></w:p>");
        xml.push_str("</w:hdr>");
        xml
    }
}

const TEXT_PATH_SHAPETYPE: &str = concat!(
    r#"<v:shapetype id="_x0000_t136" coordsize="21600,21600" o:spt="136" adj="10800" path="m@7,l@8,m@5,21600l@6,21600e">"#,
    r#"<v:formulas>"#,
    r#"<v:f eqn="sum #0 0 10800"/><v:f eqn="prod #0 2 1"/><v:f eqn="sum 21600 0 @1"/>"#,
    r#"<v:f eqn="sum 0 0 @2"/><v:f eqn="sum 21600 0 @3"/><v:f eqn="if @0 @3 0"/>"#,
    r#"<v:f eqn="if @0 21600 @1"/><v:f eqn="if @0 0 @2"/><v:f eqn="if @0 @4 21600"/>"#,
    r#"<v:f eqn="mid @5 @6"/><v:f eqn="mid @8 @5"/><v:f eqn="mid @7 @8"/>"#,
    r#"<v:f eqn="mid @6 @7"/><v:f eqn="sum @6 0 @5"/>"#,
    r#"</v:formulas>"#,
    r#"<v:path textpathok="t" o:connecttype="custom" o:connectlocs="@9,0;@10,10800;@11,21600;@12,10800" o:connectangles="270,180,90,0"/>"#,
    r#"<v:textpath on="t" fitshape="t"/>"#,
    r##"<v:handles><v:h position="#0,bottomRight" xrange="6629,14971"/></v:handles>"##,
    r#"<o:lock v:ext="edit" text="t" shapetype="t"/>"#,
    r#"</v:shapetype>"#,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::XmlParser;
    use quick_xml::events::Event;

    #[test]
    fn test_watermark_text_escaped() {
        let xml = HeaderWriter::new("R&D \"draft\"", 523.0).write();
        assert!(xml.contains(r#"string="R&amp;D &quot;draft&quot;""#));
        assert!(xml.contains("rotation:315"));
        assert!(xml.contains("width:523.0pt"));
    }

    #[test]
    fn test_header_is_well_formed() {
        let xml = HeaderWriter::new("SAMPLE", 500.0).write();
        let mut reader = XmlParser::from_string(&xml);
        let mut buf = Vec::new();
        let mut depth = 0i32;
        loop {
            match reader.read_event_into(&mut buf).unwrap() {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        assert_eq!(depth, 0);
    }
}
