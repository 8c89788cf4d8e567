//! Print surface
//!
//! Serializes a print-mode render model into a standalone HTML page with one
//! absolutely-positioned box per render item. Page size is set through
//! `@page` so the host's print facility paginates exactly as planned.

use crate::{RenderError, RenderItem, RenderModel, Result};
use std::fmt::Write;

/// Serialize a print-mode model as HTML
pub fn to_print_html(model: &RenderModel) -> Result<String> {
    if !model.mode.is_print() {
        return Err(RenderError::NotPrintMode);
    }

    let (width, height) = model
        .pages
        .first()
        .map(|p| (p.width, p.height))
        .unwrap_or((0.0, 0.0));

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&model.title));
    html.push_str("<style>\n");
    let _ = writeln!(html, "@page {{ size: {:.2}pt {:.2}pt; margin: 0; }}", width, height);
    html.push_str("body { margin: 0; }\n");
    html.push_str(
        ".page { position: relative; overflow: hidden; page-break-after: always; }\n\
         .page:last-child { page-break-after: auto; }\n\
         .page > * { position: absolute; box-sizing: border-box; }\n\
         .run { white-space: pre; line-height: 1.3; }\n",
    );
    html.push_str("</style>\n</head>\n<body>\n");

    for page in &model.pages {
        let _ = writeln!(
            html,
            "<div class=\"page\" style=\"width:{:.2}pt;height:{:.2}pt\">",
            page.width, page.height
        );
        for item in &page.items {
            write_item(&mut html, item);
        }
        html.push_str("</div>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn write_item(html: &mut String, item: &RenderItem) {
    match item {
        RenderItem::Rectangle {
            bounds,
            fill,
            stroke,
            stroke_width,
        } => {
            let _ = write!(
                html,
                "<div style=\"left:{:.2}pt;top:{:.2}pt;width:{:.2}pt;height:{:.2}pt",
                bounds.x, bounds.y, bounds.width, bounds.height
            );
            if let Some(fill) = fill {
                let _ = write!(html, ";background:{}", fill.to_css());
            }
            if let Some(stroke) = stroke {
                let _ = write!(html, ";border:{:.2}pt solid {}", stroke_width, stroke.to_css());
            }
            html.push_str("\"></div>\n");
        }
        RenderItem::Line {
            x1,
            y1,
            x2,
            y2: _,
            color,
            width,
        } => {
            let _ = writeln!(
                html,
                "<div style=\"left:{:.2}pt;top:{:.2}pt;width:{:.2}pt;border-top:{:.2}pt solid {}\"></div>",
                x1.min(*x2),
                y1,
                (x2 - x1).abs(),
                width,
                color.to_css()
            );
        }
        RenderItem::Image(image) => {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"{}\" style=\"left:{:.2}pt;top:{:.2}pt;width:{:.2}pt;height:{:.2}pt;object-fit:contain\">",
                escape_html(&image.source),
                escape_html(image.alt_text.as_deref().unwrap_or("")),
                image.bounds.x,
                image.bounds.y,
                image.bounds.width,
                image.bounds.height
            );
        }
        RenderItem::Watermark(mark) => {
            let _ = writeln!(
                html,
                "<div class=\"run\" style=\"left:{:.2}pt;top:{:.2}pt;font-size:{:.2}pt;color:{};font-weight:bold;transform:translate(-50%,-50%) rotate(-{:.1}deg)\">{}</div>",
                mark.center_x,
                mark.center_y,
                mark.font_size,
                mark.color.to_css(),
                mark.rotation,
                escape_html(&mark.text)
            );
        }
        RenderItem::GlyphRun(run) => {
            let _ = writeln!(
                html,
                "<div class=\"run\" style=\"left:{:.2}pt;top:{:.2}pt;width:{:.2}pt;font-family:'{}';font-size:{:.2}pt;font-weight:{};font-style:{};color:{};text-align:{}\">{}</div>",
                run.bounds.x,
                run.bounds.y,
                run.bounds.width,
                escape_html(&run.font_family),
                run.font_size,
                if run.bold { "bold" } else { "normal" },
                if run.italic { "italic" } else { "normal" },
                run.color.to_css(),
                run.align.as_css(),
                escape_html(&run.text)
            );
        }
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PresentationMode, PreviewRenderer};
    use doc_model::ExamDocument;
    use layout_engine::LayoutEngine;

    #[test]
    fn test_print_html_contains_questions() {
        let mut doc = ExamDocument::default_template();
        doc.settings.watermark_text = "R&D <draft>".into();
        let plan = LayoutEngine::default().layout(&doc).unwrap();
        let model = PreviewRenderer::default().render(&plan, PresentationMode::Print);
        let html = to_print_html(&model).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("@page { size: 595.28pt 841.89pt; margin: 0; }"));
        assert_eq!(html.matches("<div class=\"page\"").count(), plan.page_count());
        assert!(html.contains("R&amp;D &lt;draft&gt;"));
        assert!(html.contains(&escape_html(&doc.mcqs[0].options[0])));
    }

    #[test]
    fn test_interactive_model_rejected() {
        let plan = LayoutEngine::default()
            .layout(&ExamDocument::default_template())
            .unwrap();
        let model = PreviewRenderer::default().render(&plan, PresentationMode::interactive());
        assert!(matches!(to_print_html(&model), Err(RenderError::NotPrintMode)));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_html("2H₂O → H₂"), "2H₂O → H₂");
    }
}
