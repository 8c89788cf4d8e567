//! Layout plan structure
//!
//! The plan is consumed unchanged by the preview renderer and the DOCX
//! exporter. Block contents carry the final numbering and lettering; the
//! positioned lines carry the wrapping used for pagination.

use crate::{LayoutError, LetteredOption, PageConfig, TextRole};
use doc_model::{Bucket, ImageSource, LogoSide, MarksStatus, QuestionId};
use serde::Serialize;

/// A rectangle in layout coordinates (points)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow or shrink by `d` on every side
    pub fn inset(&self, d: f32) -> Self {
        Self::new(self.x + d, self.y + d, self.width - 2.0 * d, self.height - 2.0 * d)
    }
}

/// Horizontal alignment of a placed line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One estimated line of text, positioned relative to its block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub role: TextRole,
    /// Left edge of the line box
    pub x: f32,
    /// Top of the line box
    pub y: f32,
    /// Width of the line box
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub align: Align,
}

/// A logo placed relative to its block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedImage {
    pub side: LogoSide,
    pub source: ImageSource,
    pub bounds: Rect,
}

/// Header field shown under the title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoField {
    pub label: String,
    pub value: String,
}

impl InfoField {
    pub fn display_text(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

/// Exam header content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBlock {
    pub school_name: String,
    pub campus: Option<String>,
    pub exam_title: String,
    /// Info fields grouped into display rows
    pub info_rows: Vec<Vec<InfoField>>,
    pub logo_left: Option<ImageSource>,
    pub logo_right: Option<ImageSource>,
}

impl HeaderBlock {
    /// Title lines in display order
    pub fn title_lines(&self) -> Vec<(TextRole, &str)> {
        let mut lines = Vec::new();
        if !self.school_name.trim().is_empty() {
            lines.push((TextRole::SchoolName, self.school_name.as_str()));
        }
        if let Some(campus) = self.campus.as_deref().filter(|c| !c.trim().is_empty()) {
            lines.push((TextRole::Campus, campus));
        }
        if !self.exam_title.trim().is_empty() {
            lines.push((TextRole::ExamTitle, self.exam_title.as_str()));
        }
        lines
    }

    /// Text of an info row, fields separated by tabs
    pub fn info_row_text(row: &[InfoField]) -> String {
        row.iter()
            .map(InfoField::display_text)
            .collect::<Vec<_>>()
            .join("\t")
    }

    pub fn logo(&self, side: LogoSide) -> Option<&ImageSource> {
        match side {
            LogoSide::Left => self.logo_left.as_ref(),
            LogoSide::Right => self.logo_right.as_ref(),
        }
    }
}

/// Section heading and instruction line of a bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionLead {
    pub bucket: Bucket,
    pub heading: String,
    /// Marks sum of the bucket, shown beside the heading
    pub marks: u32,
    pub instruction: Option<String>,
}

impl SectionLead {
    /// Heading text with the marks label after a tab
    pub fn heading_text(&self) -> String {
        if self.marks > 0 {
            format!("{}\t({} Marks)", self.heading, self.marks)
        } else {
            self.heading.clone()
        }
    }
}

/// A numbered question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionBlock {
    pub id: QuestionId,
    pub bucket: Bucket,
    /// 1-based number within the bucket
    pub number: usize,
    pub number_label: String,
    pub text: String,
    pub marks_label: String,
    pub options: Vec<LetteredOption>,
    /// Columns of the option grid (0 when there are no options)
    pub option_columns: usize,
}

impl QuestionBlock {
    /// Question line: number, text and marks separated by tabs
    pub fn line_text(&self) -> String {
        format!("{}\t{}\t{}", self.number_label, self.text, self.marks_label)
    }

    /// Options grouped into grid rows, row-major
    pub fn option_rows(&self) -> Vec<&[LetteredOption]> {
        if self.options.is_empty() || self.option_columns == 0 {
            return Vec::new();
        }
        self.options.chunks(self.option_columns).collect()
    }
}

/// A question that could not be laid out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedBlock {
    pub id: QuestionId,
    pub bucket: Bucket,
    pub number: usize,
    pub message: String,
    #[serde(skip)]
    pub error: LayoutError,
}

impl FailedBlock {
    pub fn line_text(&self) -> String {
        format!("{}.\t[{}]", self.number, self.message)
    }
}

/// Content of a flow block
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum BlockContent {
    Header(HeaderBlock),
    SectionLead(SectionLead),
    Question(QuestionBlock),
    Failed(FailedBlock),
}

impl BlockContent {
    /// Visible paragraph texts of this block, in reading order
    pub fn visible_text(&self) -> Vec<String> {
        match self {
            BlockContent::Header(header) => {
                let mut text: Vec<String> = header
                    .title_lines()
                    .into_iter()
                    .map(|(_, t)| t.to_string())
                    .collect();
                text.extend(header.info_rows.iter().map(|row| HeaderBlock::info_row_text(row)));
                text
            }
            BlockContent::SectionLead(lead) => {
                let mut text = vec![lead.heading_text()];
                text.extend(lead.instruction.clone());
                text
            }
            BlockContent::Question(question) => {
                let mut text = vec![question.line_text()];
                text.extend(question.options.iter().map(LetteredOption::display_text));
                text
            }
            BlockContent::Failed(failed) => vec![failed.line_text()],
        }
    }

    /// Bucket this block belongs to, if any
    pub fn bucket(&self) -> Option<Bucket> {
        match self {
            BlockContent::Header(_) => None,
            BlockContent::SectionLead(lead) => Some(lead.bucket),
            BlockContent::Question(q) => Some(q.bucket),
            BlockContent::Failed(f) => Some(f.bucket),
        }
    }
}

/// An atomic unit of flow
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanBlock {
    pub content: BlockContent,
    /// Position within the page content area once paginated
    pub bounds: Rect,
    /// Lines relative to the block origin
    pub lines: Vec<PlacedLine>,
    /// Images relative to the block origin
    pub images: Vec<PlacedImage>,
    /// Must share a page with the following block
    pub keep_with_next: bool,
}

impl PlanBlock {
    pub fn height(&self) -> f32 {
        self.bounds.height
    }
}

/// Border drawn around every page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBorder {
    pub bounds: Rect,
    pub width: f32,
}

/// Decorations applied uniformly to every page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageDecorations {
    pub watermark: Option<String>,
    pub border: Option<PageBorder>,
}

/// A page of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanPage {
    /// Page index (0-based)
    pub index: usize,
    /// Full page bounds
    pub bounds: Rect,
    /// Content area (excluding margins)
    pub content_area: Rect,
    pub blocks: Vec<PlanBlock>,
    pub decorations: PageDecorations,
    /// Content runs past the bottom of the content area
    pub overflows: bool,
}

/// Declared and computed marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarksSummary {
    pub declared: u32,
    pub computed: u32,
    pub mcq: u32,
    pub short: u32,
    pub long: u32,
}

impl MarksSummary {
    pub fn bucket(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::MultipleChoice => self.mcq,
            Bucket::ShortAnswer => self.short,
            Bucket::LongAnswer => self.long,
        }
    }

    pub fn status(&self) -> MarksStatus {
        if self.declared == self.computed {
            MarksStatus::Matches(self.computed)
        } else {
            MarksStatus::Mismatch {
                declared: self.declared,
                computed: self.computed,
            }
        }
    }
}

/// The paginated layout of an exam
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub pages: Vec<PlanPage>,
    pub marks: MarksSummary,
    pub font_scale: f32,
    pub page_config: PageConfig,
    pub exam_title: String,
}

impl LayoutPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All blocks in flow order
    pub fn blocks(&self) -> impl Iterator<Item = &PlanBlock> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// All blocks with the index of the page they are on
    pub fn blocks_with_page(&self) -> impl Iterator<Item = (usize, &PlanBlock)> {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter().map(move |b| (p.index, b)))
    }

    /// The header block
    pub fn header(&self) -> Option<&HeaderBlock> {
        self.blocks().find_map(|b| match &b.content {
            BlockContent::Header(h) => Some(h),
            _ => None,
        })
    }

    /// Rendered question blocks of a bucket, in order
    pub fn questions(&self, bucket: Bucket) -> Vec<&QuestionBlock> {
        self.blocks()
            .filter_map(|b| match &b.content {
                BlockContent::Question(q) if q.bucket == bucket => Some(q),
                _ => None,
            })
            .collect()
    }

    /// Section lead of a bucket, absent for empty buckets
    pub fn section(&self, bucket: Bucket) -> Option<&SectionLead> {
        self.blocks().find_map(|b| match &b.content {
            BlockContent::SectionLead(lead) if lead.bucket == bucket => Some(lead),
            _ => None,
        })
    }

    /// Numbers assigned in a bucket, including failed blocks
    pub fn numbering(&self, bucket: Bucket) -> Vec<usize> {
        self.blocks()
            .filter_map(|b| match &b.content {
                BlockContent::Question(q) if q.bucket == bucket => Some(q.number),
                BlockContent::Failed(f) if f.bucket == bucket => Some(f.number),
                _ => None,
            })
            .collect()
    }

    /// Blocks that failed to lay out
    pub fn failures(&self) -> Vec<&FailedBlock> {
        self.blocks()
            .filter_map(|b| match &b.content {
                BlockContent::Failed(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Visible paragraph texts of the whole plan, in reading order
    pub fn visible_text(&self) -> Vec<String> {
        self.blocks().flat_map(|b| b.content.visible_text()).collect()
    }

    /// Decorations shared by every page
    pub fn decorations(&self) -> PageDecorations {
        self.pages
            .first()
            .map(|p| p.decorations.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], columns: usize) -> QuestionBlock {
        QuestionBlock {
            id: "m1".into(),
            bucket: Bucket::MultipleChoice,
            number: 1,
            number_label: "1.".into(),
            text: "Pick".into(),
            marks_label: "(2)".into(),
            options: options
                .iter()
                .enumerate()
                .map(|(i, t)| LetteredOption {
                    letter: crate::option_letter(i).unwrap(),
                    text: t.to_string(),
                })
                .collect(),
            option_columns: columns,
        }
    }

    #[test]
    fn test_option_rows_row_major() {
        let q = question(&["a", "b", "c", "d"], 2);
        let rows = q.option_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1].letter, 'B');
        assert_eq!(rows[1][0].letter, 'C');
    }

    #[test]
    fn test_question_visible_text() {
        let content = BlockContent::Question(question(&["x", "y"], 2));
        assert_eq!(
            content.visible_text(),
            vec!["1.\tPick\t(2)".to_string(), "(A) x".to_string(), "(B) y".to_string()]
        );
    }

    #[test]
    fn test_section_heading_text() {
        let lead = SectionLead {
            bucket: Bucket::LongAnswer,
            heading: "SECTION C: LONG QUESTIONS".into(),
            marks: 0,
            instruction: None,
        };
        assert_eq!(lead.heading_text(), "SECTION C: LONG QUESTIONS");
    }

    #[test]
    fn test_rect_inset() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0).inset(10.0);
        assert_eq!(r, Rect::new(10.0, 10.0, 80.0, 30.0));
        assert_eq!(r.right(), 90.0);
        assert_eq!(r.bottom(), 40.0);
    }
}
