//! Items drawn on preview and print pages

use serde::{Deserialize, Serialize};

use crate::PresentationMode;

/// A rectangle in render coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Scale position and size by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }
}

impl From<layout_engine::Rect> for Rect {
    fn from(r: layout_engine::Rect) -> Self {
        Self {
            x: r.x as f64,
            y: r.y as f64,
            width: r.width as f64,
            height: r.height as f64,
        }
    }
}

/// 8-bit RGBA paint for page items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// CSS `rgba()` notation
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Horizontal alignment of a glyph run inside its box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl From<layout_engine::Align> for TextAlign {
    fn from(align: layout_engine::Align) -> Self {
        match align {
            layout_engine::Align::Left => TextAlign::Left,
            layout_engine::Align::Center => TextAlign::Center,
            layout_engine::Align::Right => TextAlign::Right,
        }
    }
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One placed line of exam text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRun {
    pub text: String,
    pub font_family: String,
    /// Points, after font scale and zoom
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    /// Line box the text is aligned in
    pub bounds: Rect,
    pub align: TextAlign,
}

/// Logo image render information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRenderInfo {
    /// Data URI or URL of the image
    pub source: String,
    /// Logo box on the page
    pub bounds: Rect,
    pub alt_text: Option<String>,
}

/// Watermark drawn behind page content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkRenderInfo {
    pub text: String,
    /// Center of the watermark
    pub center_x: f64,
    pub center_y: f64,
    pub font_size: f64,
    /// Rotation in degrees (counter-clockwise)
    pub rotation: f64,
    pub color: Color,
}

/// Something drawn on a page, in drawing order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RenderItem {
    GlyphRun(GlyphRun),
    /// Page background or border
    Rectangle {
        bounds: Rect,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width: f64,
    },
    /// Separator under the header
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    Image(ImageRenderInfo),
    Watermark(WatermarkRenderInfo),
}

/// Kind of an on-screen notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Declared total differs from the marks sum
    MarksMismatch,
    /// A question could not be laid out
    BlockFailed,
    /// An image was left out of the preview
    ImageSkipped,
}

/// Message shown next to the interactive preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// A rendered page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRender {
    pub page_index: u32,
    pub width: f64,
    pub height: f64,
    pub items: Vec<RenderItem>,
}

impl PageRender {
    /// Text of every glyph run on the page, in drawing order
    pub fn glyph_texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            RenderItem::GlyphRun(run) => Some(run.text.as_str()),
            _ => None,
        })
    }
}

/// The complete render model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub title: String,
    pub mode: PresentationMode,
    pub pages: Vec<PageRender>,
    /// Interactive notices; always empty in print mode
    pub notices: Vec<Notice>,
}

impl RenderModel {
    pub fn new(title: impl Into<String>, mode: PresentationMode) -> Self {
        Self {
            title: title.into(),
            mode,
            pages: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub fn add_page(&mut self, page: PageRender) {
        self.pages.push(page);
    }
}
