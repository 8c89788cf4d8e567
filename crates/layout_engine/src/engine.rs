//! Exam layout
//!
//! Builds the flow blocks of an exam (header, then a lead block and the
//! question blocks of every non-empty bucket) and paginates them. All
//! dimensions below are in points at font scale 1.0.

use crate::{
    letter_options, marks_label, number_label, Align, BlockContent, FailedBlock, HeaderBlock,
    InfoField, LayoutError, LayoutPlan, LetteredOption, MarksSummary, normalize_text, PageBorder, PageConfig,
    PageDecorations, Paginator, PlacedImage, PlacedLine, PlanBlock, QuestionBlock, Rect, Result,
    SectionLead, TextMetrics, TextRole,
};
use doc_model::{Bucket, BucketView, ExamDocument, ExamHeader, ExamSettings, LogoSide, Question};
use tracing::debug;

const LOGO_BOX: f32 = 56.0;
const LOGO_GAP: f32 = 8.0;
const HEADER_RULE_GAP: f32 = 8.0;
const HEADER_SPACING: f32 = 12.0;
const SECTION_SPACING_BEFORE: f32 = 10.0;
const INSTRUCTION_GAP: f32 = 2.0;
const LEAD_SPACING_AFTER: f32 = 6.0;
const NUMBER_COLUMN: f32 = 24.0;
const MARKS_COLUMN: f32 = 36.0;
const OPTIONS_GAP: f32 = 4.0;
const OPTION_ROW_GAP: f32 = 2.0;
const OPTION_GUTTER: f32 = 6.0;
const QUESTION_SPACING: f32 = 8.0;

/// Heading printed above a bucket
pub fn section_heading(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::MultipleChoice => "SECTION A: MULTIPLE CHOICE QUESTIONS",
        Bucket::ShortAnswer => "SECTION B: SHORT QUESTIONS",
        Bucket::LongAnswer => "SECTION C: LONG QUESTIONS",
    }
}

/// Computes layout plans from exam documents
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: PageConfig,
    metrics: TextMetrics,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            metrics: TextMetrics::default(),
        }
    }

    /// Replace the text metrics used for estimates
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Lay out a document.
    ///
    /// Fails when the page setup or the document is invalid. A question
    /// that cannot be laid out becomes a failed block and the rest of the
    /// document is still laid out.
    pub fn layout(&self, doc: &ExamDocument) -> Result<LayoutPlan> {
        self.config.validate()?;
        doc.validate()?;

        let scale = doc.settings.font_scale;
        let width = self.config.content_width();

        let mut blocks = vec![self.header_block(&doc.header, scale, width)];
        for view in doc.buckets() {
            if view.is_empty() {
                continue;
            }
            blocks.push(self.lead_block(&view, scale, width));
            for (index, question) in view.questions.iter().enumerate() {
                blocks.push(self.question_block(view.bucket, index + 1, question, scale, width));
            }
        }

        let decorations = self.decorations(&doc.settings);
        let pages = Paginator::new(self.config.clone()).paginate(blocks, &decorations);

        let marks = MarksSummary {
            declared: doc.header.total_marks,
            computed: doc.computed_total_marks(),
            mcq: doc.bucket_marks(Bucket::MultipleChoice),
            short: doc.bucket_marks(Bucket::ShortAnswer),
            long: doc.bucket_marks(Bucket::LongAnswer),
        };

        let plan = LayoutPlan {
            pages,
            marks,
            font_scale: scale,
            page_config: self.config.clone(),
            exam_title: doc.header.exam_title.clone(),
        };

        debug!(
            pages = plan.page_count(),
            blocks = plan.blocks().count(),
            failures = plan.failures().len(),
            "layout complete"
        );

        Ok(plan)
    }

    /// Column count of an option grid: 4, 2 or 1
    pub fn option_columns(&self, options: &[LetteredOption], scale: f32, available: f32) -> usize {
        if options.is_empty() {
            return 0;
        }
        let size = self.metrics.font_size(TextRole::OptionText, scale);
        let widest = options
            .iter()
            .map(|o| self.metrics.text_width(&o.display_text(), size, false))
            .fold(0.0, f32::max);
        let needed = widest + OPTION_GUTTER * scale;

        if needed <= available / 4.0 {
            4
        } else if needed <= available / 2.0 {
            2
        } else {
            1
        }
    }

    fn decorations(&self, settings: &ExamSettings) -> PageDecorations {
        let border = settings.show_border.then(|| PageBorder {
            bounds: Rect::new(0.0, 0.0, self.config.page_width(), self.config.page_height())
                .inset(self.config.border_inset),
            width: self.config.border_width,
        });
        PageDecorations {
            watermark: settings.watermark().map(str::to_string),
            border,
        }
    }

    fn header_block(&self, header: &ExamHeader, scale: f32, width: f32) -> PlanBlock {
        let (first_row, second_row): (Vec<InfoField>, Vec<InfoField>) = header
            .info_fields()
            .into_iter()
            .map(|(label, value)| InfoField {
                label: label.to_string(),
                value: normalize_text(&value),
            })
            .partition(|f| matches!(f.label.as_str(), "Subject" | "Class" | "Total Marks"));

        let content = HeaderBlock {
            school_name: normalize_text(&header.school_name),
            campus: header.campus().map(normalize_text),
            exam_title: normalize_text(&header.exam_title),
            info_rows: vec![first_row, second_row],
            logo_left: header.logo(LogoSide::Left).cloned(),
            logo_right: header.logo(LogoSide::Right).cloned(),
        };

        let logo_box = LOGO_BOX * scale;
        let has_logo = content.logo_left.is_some() || content.logo_right.is_some();
        let side = if has_logo { logo_box + LOGO_GAP * scale } else { 0.0 };
        let title_width = width - 2.0 * side;

        let mut lines = Vec::new();
        let mut y = 0.0;
        for (role, text) in content.title_lines() {
            let placed = self.place_text(text, role, scale, side, y, title_width, Align::Center);
            y += lines_height(&placed);
            lines.extend(placed);
        }

        let mut images = Vec::new();
        for logo_side in [LogoSide::Left, LogoSide::Right] {
            if let Some(source) = content.logo(logo_side) {
                let x = match logo_side {
                    LogoSide::Left => 0.0,
                    LogoSide::Right => width - logo_box,
                };
                images.push(PlacedImage {
                    side: logo_side,
                    source: source.clone(),
                    bounds: Rect::new(x, 0.0, logo_box, logo_box),
                });
            }
        }

        if has_logo {
            y = y.max(logo_box);
        }
        y += HEADER_RULE_GAP * scale;

        for row in &content.info_rows {
            if row.is_empty() {
                continue;
            }
            let column_width = width / row.len() as f32;
            let mut row_height: f32 = 0.0;
            for (i, field) in row.iter().enumerate() {
                let placed = self.place_text(
                    &field.display_text(),
                    TextRole::HeaderInfo,
                    scale,
                    i as f32 * column_width,
                    y,
                    column_width,
                    Align::Left,
                );
                row_height = row_height.max(lines_height(&placed));
                lines.extend(placed);
            }
            y += row_height;
        }
        y += HEADER_SPACING * scale;

        PlanBlock {
            content: BlockContent::Header(content),
            bounds: Rect::new(0.0, 0.0, width, y),
            lines,
            images,
            keep_with_next: false,
        }
    }

    fn lead_block(&self, view: &BucketView<'_>, scale: f32, width: f32) -> PlanBlock {
        let instruction = normalize_text(view.instruction);
        let instruction = instruction.trim();
        let content = SectionLead {
            bucket: view.bucket,
            heading: section_heading(view.bucket).to_string(),
            marks: view.marks(),
            instruction: (!instruction.is_empty()).then(|| instruction.to_string()),
        };

        let mut lines = Vec::new();
        let mut y = SECTION_SPACING_BEFORE * scale;

        let mut heading_width = width;
        if content.marks > 0 {
            let label = format!("({} Marks)", content.marks);
            let role = TextRole::SectionHeading;
            let size = self.metrics.font_size(role, scale);
            let label_width = self.metrics.text_width(&label, size, role.bold()) + OPTION_GUTTER * scale;
            heading_width = (width - label_width).max(0.0);
            lines.extend(self.place_text(
                &label,
                role,
                scale,
                heading_width,
                y,
                width - heading_width,
                Align::Right,
            ));
        }

        let heading = self.place_text(
            &content.heading,
            TextRole::SectionHeading,
            scale,
            0.0,
            y,
            heading_width,
            Align::Left,
        );
        y += lines_height(&heading);
        lines.extend(heading);

        if let Some(instruction) = &content.instruction {
            y += INSTRUCTION_GAP * scale;
            let placed = self.place_text(instruction, TextRole::Instruction, scale, 0.0, y, width, Align::Left);
            y += lines_height(&placed);
            lines.extend(placed);
        }
        y += LEAD_SPACING_AFTER * scale;

        PlanBlock {
            content: BlockContent::SectionLead(content),
            bounds: Rect::new(0.0, 0.0, width, y),
            lines,
            images: Vec::new(),
            keep_with_next: true,
        }
    }

    fn question_block(
        &self,
        bucket: Bucket,
        number: usize,
        question: &Question,
        scale: f32,
        width: f32,
    ) -> PlanBlock {
        let options = match letter_options(&question.options) {
            Ok(options) => options,
            Err(count) => return self.failed_block(bucket, number, question, count, scale, width),
        };

        let number_column = NUMBER_COLUMN * scale;
        let marks_column = MARKS_COLUMN * scale;
        let text_width = (width - number_column - marks_column).max(0.0);

        let mut content = QuestionBlock {
            id: question.id.clone(),
            bucket,
            number,
            number_label: number_label(number),
            text: normalize_text(&question.text),
            marks_label: marks_label(question.marks),
            options,
            option_columns: 0,
        };

        let mut lines = Vec::new();
        let number_line = self.place_text(
            &content.number_label,
            TextRole::QuestionText,
            scale,
            0.0,
            0.0,
            number_column,
            Align::Left,
        );
        let text_lines = self.place_text(
            &content.text,
            TextRole::QuestionText,
            scale,
            number_column,
            0.0,
            text_width,
            Align::Left,
        );
        let marks_line = self.place_text(
            &content.marks_label,
            TextRole::MarksLabel,
            scale,
            width - marks_column,
            0.0,
            marks_column,
            Align::Right,
        );
        let mut y = lines_height(&text_lines)
            .max(lines_height(&number_line))
            .max(lines_height(&marks_line));
        lines.extend(number_line);
        lines.extend(text_lines);
        lines.extend(marks_line);

        let available = width - number_column;
        content.option_columns = self.option_columns(&content.options, scale, available);
        if content.option_columns > 0 {
            y += OPTIONS_GAP * scale;
            let column_width = available / content.option_columns as f32;
            for row in content.options.chunks(content.option_columns) {
                let mut row_height: f32 = 0.0;
                for (i, option) in row.iter().enumerate() {
                    let placed = self.place_text(
                        &option.display_text(),
                        TextRole::OptionText,
                        scale,
                        number_column + i as f32 * column_width,
                        y,
                        column_width,
                        Align::Left,
                    );
                    row_height = row_height.max(lines_height(&placed));
                    lines.extend(placed);
                }
                y += row_height + OPTION_ROW_GAP * scale;
            }
        }
        y += QUESTION_SPACING * scale;

        PlanBlock {
            content: BlockContent::Question(content),
            bounds: Rect::new(0.0, 0.0, width, y),
            lines,
            images: Vec::new(),
            keep_with_next: false,
        }
    }

    fn failed_block(
        &self,
        bucket: Bucket,
        number: usize,
        question: &Question,
        count: usize,
        scale: f32,
        width: f32,
    ) -> PlanBlock {
        let error = LayoutError::TooManyOptions {
            id: question.id.clone(),
            number,
            count,
        };
        tracing::warn!(%error, "question could not be laid out");

        let content = FailedBlock {
            id: question.id.clone(),
            bucket,
            number,
            message: error.to_string(),
            error,
        };
        let lines = self.place_text(
            &content.line_text(),
            TextRole::QuestionText,
            scale,
            0.0,
            0.0,
            width,
            Align::Left,
        );
        let height = lines_height(&lines) + QUESTION_SPACING * scale;

        PlanBlock {
            content: BlockContent::Failed(content),
            bounds: Rect::new(0.0, 0.0, width, height),
            lines,
            images: Vec::new(),
            keep_with_next: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn place_text(
        &self,
        text: &str,
        role: TextRole,
        scale: f32,
        x: f32,
        y: f32,
        width: f32,
        align: Align,
    ) -> Vec<PlacedLine> {
        let font_size = self.metrics.font_size(role, scale);
        let line_height = self.metrics.line_height(font_size);
        self.metrics
            .wrap(text, font_size, role.bold(), width)
            .into_iter()
            .enumerate()
            .map(|(i, line)| PlacedLine {
                text: line,
                role,
                x,
                y: y + i as f32 * line_height,
                width,
                height: line_height,
                font_size,
                align,
            })
            .collect()
    }
}

fn lines_height(lines: &[PlacedLine]) -> f32 {
    lines.iter().map(|l| l.height).sum()
}
