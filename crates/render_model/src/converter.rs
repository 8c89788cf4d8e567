//! Convert a layout plan to a render model

use crate::{
    Color, GlyphRun, ImageRenderInfo, Notice, NoticeKind, PageRender, PresentationMode, Rect,
    RenderItem, RenderModel, TextAlign, WatermarkRenderInfo,
};
use doc_model::{LogoSide, MarksStatus};
use layout_engine::{BlockContent, LayoutPlan, PlanBlock, PlanPage, TextRole};

/// Configuration for render conversion
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Background color for pages
    pub page_background: Color,
    /// Default text color
    pub text_color: Color,
    /// Color of failed block placeholders
    pub error_color: Color,
    /// Page border color
    pub border_color: Color,
    /// Watermark color
    pub watermark_color: Color,
    /// Default font family
    pub font_family: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            page_background: Color::WHITE,
            text_color: Color::BLACK,
            error_color: Color::rgb(192, 0, 0),
            border_color: Color::BLACK,
            watermark_color: Color::rgba(160, 160, 160, 64),
            font_family: "Times New Roman".to_string(),
        }
    }
}

/// Renders layout plans for screen and print
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    config: RenderConfig,
}

impl PreviewRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a plan.
    ///
    /// All coordinates are multiplied by the mode's scale. Notices are only
    /// produced in interactive mode.
    pub fn render(&self, plan: &LayoutPlan, mode: PresentationMode) -> RenderModel {
        let scale = mode.scale();
        let mut model = RenderModel::new(plan.exam_title.clone(), mode);
        let mut notices = Vec::new();

        for page in &plan.pages {
            model.add_page(self.render_page(page, scale, &mut notices));
        }

        if !mode.is_print() {
            if let MarksStatus::Mismatch { declared, computed } = plan.marks.status() {
                notices.insert(
                    0,
                    Notice {
                        kind: NoticeKind::MarksMismatch,
                        message: format!(
                            "Total marks shows {} but the questions add up to {}",
                            declared, computed
                        ),
                    },
                );
            }
            for failed in plan.failures() {
                notices.push(Notice {
                    kind: NoticeKind::BlockFailed,
                    message: failed.message.clone(),
                });
            }
            model.notices = notices;
        }

        model
    }

    fn render_page(&self, page: &PlanPage, scale: f64, notices: &mut Vec<Notice>) -> PageRender {
        let bounds = Rect::from(page.bounds).scaled(scale);
        let mut page_render = PageRender {
            page_index: page.index as u32,
            width: bounds.width,
            height: bounds.height,
            items: Vec::new(),
        };

        // Page background
        page_render.items.push(RenderItem::Rectangle {
            bounds,
            fill: Some(self.config.page_background),
            stroke: None,
            stroke_width: 0.0,
        });

        if let Some(text) = &page.decorations.watermark {
            page_render.items.push(RenderItem::Watermark(WatermarkRenderInfo {
                text: text.clone(),
                center_x: bounds.width / 2.0,
                center_y: bounds.height / 2.0,
                font_size: TextRole::Watermark.base_size() as f64 * scale,
                rotation: 45.0,
                color: self.config.watermark_color,
            }));
        }

        if let Some(border) = &page.decorations.border {
            page_render.items.push(RenderItem::Rectangle {
                bounds: Rect::from(border.bounds).scaled(scale),
                fill: None,
                stroke: Some(self.config.border_color),
                stroke_width: border.width as f64 * scale,
            });
        }

        for block in &page.blocks {
            self.render_block(block, scale, &mut page_render.items, notices);
        }

        page_render
    }

    fn render_block(
        &self,
        block: &PlanBlock,
        scale: f64,
        items: &mut Vec<RenderItem>,
        notices: &mut Vec<Notice>,
    ) {
        let origin_x = block.bounds.x as f64;
        let origin_y = block.bounds.y as f64;
        let color = match block.content {
            BlockContent::Failed(_) => self.config.error_color,
            _ => self.config.text_color,
        };

        for image in &block.images {
            if image.source.is_data_uri() {
                if let Err(e) = image.source.decode() {
                    tracing::warn!(side = ?image.side, error = %e, "logo left out of preview");
                    notices.push(Notice {
                        kind: NoticeKind::ImageSkipped,
                        message: format!("{} logo could not be read: {}", side_name(image.side), e),
                    });
                    continue;
                }
            }
            let bounds = Rect::new(
                origin_x + image.bounds.x as f64,
                origin_y + image.bounds.y as f64,
                image.bounds.width as f64,
                image.bounds.height as f64,
            );
            items.push(RenderItem::Image(ImageRenderInfo {
                source: image.source.as_str().to_string(),
                bounds: bounds.scaled(scale),
                alt_text: Some(format!("{} logo", side_name(image.side))),
            }));
        }

        for line in &block.lines {
            if line.text.is_empty() {
                continue;
            }
            let bounds = Rect::new(
                origin_x + line.x as f64,
                origin_y + line.y as f64,
                line.width as f64,
                line.height as f64,
            );
            items.push(RenderItem::GlyphRun(GlyphRun {
                text: line.text.clone(),
                font_family: self.config.font_family.clone(),
                font_size: line.font_size as f64 * scale,
                bold: line.role.bold(),
                italic: line.role.italic(),
                color,
                bounds: bounds.scaled(scale),
                align: TextAlign::from(line.align),
            }));
        }

        if let BlockContent::Header(_) = block.content {
            // Rule under the header
            let y = (origin_y + block.bounds.height as f64) * scale;
            items.push(RenderItem::Line {
                x1: origin_x * scale,
                y1: y,
                x2: (origin_x + block.bounds.width as f64) * scale,
                y2: y,
                color: self.config.text_color,
                width: scale,
            });
        }
    }
}

fn side_name(side: LogoSide) -> &'static str {
    match side {
        LogoSide::Left => "Left",
        LogoSide::Right => "Right",
    }
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
    fn test_print_mode_is_one_to_one() {
        let plan = plan(&ExamDocument::default_template());
        let model = PreviewRenderer::default().render(&plan, PresentationMode::Print);

        assert_eq!(model.pages.len(), plan.page_count());
        assert!((model.pages[0].width - 595.276).abs() < 0.01);
        assert!(model.notices.is_empty());
    }

    #[test]
    fn test_interactive_mode_scales_down() {
        let plan = plan(&ExamDocument::default_template());
        let renderer = PreviewRenderer::default();
        let print = renderer.render(&plan, PresentationMode::Print);
        let screen = renderer.render(&plan, PresentationMode::from_print_flag(false));

        assert!((screen.pages[0].width - print.pages[0].width * 0.75).abs() < 1e-6);
        let first_run = |m: &RenderModel| {
            m.pages[0].items.iter().find_map(|i| match i {
                RenderItem::GlyphRun(r) => Some(r.clone()),
                _ => None,
            })
        };
        let (p, s) = (first_run(&print).unwrap(), first_run(&screen).unwrap());
        assert_eq!(p.text, s.text);
        assert!((s.font_size - p.font_size * 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_glyph_runs_follow_plan_lines() {
        let doc = ExamDocument::default_template();
        let plan = plan(&doc);
        let model = PreviewRenderer::default().render(&plan, PresentationMode::Print);

        let texts: Vec<&str> = model.pages.iter().flat_map(|p| p.glyph_texts()).collect();
        assert!(texts.contains(&"1."));
        assert!(texts.contains(&"(2)"));
        assert!(texts.iter().any(|t| t.starts_with("(A) ")));
        assert!(texts.contains(&doc.header.school_name.as_str()));
    }

    #[test]
    fn test_mismatch_notice_only_interactive() {
        let plan = plan(&ExamDocument::default_template());
        let renderer = PreviewRenderer::default();

        let screen = renderer.render(&plan, PresentationMode::interactive());
        assert_eq!(screen.notices[0].kind, NoticeKind::MarksMismatch);
        assert!(screen.notices[0].message.contains("115"));

        let print = renderer.render(&plan, PresentationMode::Print);
        assert!(print.notices.is_empty());
    }

    #[test]
    fn test_decorations_on_every_page() {
        let mut doc = ExamDocument::default_template();
        doc.settings.watermark_text = "SAMPLE".into();
        doc.settings.show_border = true;
        doc.settings.font_scale = 2.0;
        let plan = plan(&doc);
        let model = PreviewRenderer::default().render(&plan, PresentationMode::Print);

        assert!(model.pages.len() > 1);
        for page in &model.pages {
            assert!(page.items.iter().any(|i| matches!(i, RenderItem::Watermark(w) if w.text == "SAMPLE")));
            assert!(page
                .items
                .iter()
                .any(|i| matches!(i, RenderItem::Rectangle { stroke: Some(_), .. })));
        }
    }

    #[test]
    fn test_malformed_logo_skipped() {
        let mut doc = ExamDocument::default_template();
        doc.header.logo_left = Some(ImageSource::new("data:image/png;base64,@@@"));
        doc.header.logo_right = Some(ImageSource::from_bytes("image/png", &[0x89, 0x50, 0x4E, 0x47]));
        let plan = plan(&doc);
        let model = PreviewRenderer::default().render(&plan, PresentationMode::interactive());

        let images: Vec<_> = model.pages[0]
            .items
            .iter()
            .filter(|i| matches!(i, RenderItem::Image(_)))
            .collect();
        assert_eq!(images.len(), 1);
        assert!(model.notices.iter().any(|n| n.kind == NoticeKind::ImageSkipped));
    }

    #[test]
    fn test_render_does_not_mutate_plan() {
        let plan = plan(&ExamDocument::default_template());
        let before = plan.clone();
        let _ = PreviewRenderer::default().render(&plan, PresentationMode::Print);
        assert_eq!(plan, before);
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(16))]

        #[test]
        fn prop_zoom_scales_geometry_not_text(zoom in 0.1f64..2.0) {
            let plan = plan(&ExamDocument::default_template());
            let renderer = PreviewRenderer::default();
            let print = renderer.render(&plan, PresentationMode::Print);
            let screen = renderer.render(&plan, PresentationMode::Interactive { zoom });

            proptest::prop_assert_eq!(print.pages.len(), screen.pages.len());
            for (p, s) in print.pages.iter().zip(&screen.pages) {
                proptest::prop_assert!((s.width - p.width * zoom).abs() < 1e-6);
                proptest::prop_assert!((s.height - p.height * zoom).abs() < 1e-6);
                proptest::prop_assert_eq!(p.glyph_texts().collect::<Vec<_>>(), s.glyph_texts().collect::<Vec<_>>());
            }
        }
    }
}
