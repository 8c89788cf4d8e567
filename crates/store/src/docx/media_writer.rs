//! Media writer for DOCX files
//!
//! Decodes the header logos, checks them and sizes them for embedding.
//! A logo that cannot be embedded is logged and left out; it never fails
//! the export.

use crate::docx::escape_xml;
use doc_model::{ImageSource, LogoSide};
use layout_engine::{HeaderBlock, Rect};

/// Image formats recognised from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Svg,
    Bmp,
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: 47 49 46 38
        if data.starts_with(&[0x47, 0x49, 0x46, 0x38]) {
            return Self::Gif;
        }

        // WebP: 52 49 46 46 ... 57 45 42 50
        if data.len() >= 12 && data.starts_with(&[0x52, 0x49, 0x46, 0x46]) && &data[8..12] == b"WEBP"
        {
            return Self::WebP;
        }

        // BMP: 42 4D
        if data.starts_with(&[0x42, 0x4D]) {
            return Self::Bmp;
        }

        let head = String::from_utf8_lossy(&data[..data.len().min(256)]).to_lowercase();
        if head.contains("<svg") {
            return Self::Svg;
        }

        Self::Unknown
    }

    /// Get the MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Svg => "image/svg+xml",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Svg => "svg",
            Self::Bmp => "bmp",
            Self::Unknown => "bin",
        }
    }

    /// Whether Word renders this format as an inline picture without a fallback
    pub fn is_embeddable(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Gif | Self::Bmp)
    }

    /// Pixel dimensions read from the file header, when present
    pub fn dimensions(&self, data: &[u8]) -> Option<(u32, u32)> {
        let dims = match self {
            Self::Png => png_dimensions(data),
            Self::Jpeg => jpeg_dimensions(data),
            Self::Gif => gif_dimensions(data),
            Self::Bmp => bmp_dimensions(data),
            Self::WebP | Self::Svg | Self::Unknown => None,
        };
        dims.filter(|(w, h)| *w > 0 && *h > 0)
    }
}

fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    // IHDR width at byte 16, height at 20
    let w = data.get(16..20)?;
    let h = data.get(20..24)?;
    Some((
        u32::from_be_bytes([w[0], w[1], w[2], w[3]]),
        u32::from_be_bytes([h[0], h[1], h[2], h[3]]),
    ))
}

fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let mut i = 2;
    while i + 9 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOF0, SOF1, SOF2
        if matches!(marker, 0xC0..=0xC2) {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Some((width, height));
        }
        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + length.max(2);
    }
    None
}

fn gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let b = data.get(6..10)?;
    Some((
        u16::from_le_bytes([b[0], b[1]]) as u32,
        u16::from_le_bytes([b[2], b[3]]) as u32,
    ))
}

fn bmp_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let w = data.get(18..22)?;
    let h = data.get(22..26)?;
    let width = i32::from_le_bytes([w[0], w[1], w[2], w[3]]);
    // Negative height marks a top-down bitmap
    let height = i32::from_le_bytes([h[0], h[1], h[2], h[3]]);
    Some((width.unsigned_abs(), height.unsigned_abs()))
}

/// A logo ready to be written into the package
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub side: LogoSide,
    pub format: ImageFormat,
    pub data: Vec<u8>,
    /// Drawing extent in EMUs, fitted into the planned logo box
    pub width_emu: i64,
    pub height_emu: i64,
}

impl EmbeddedImage {
    /// File name inside `word/media/`
    pub fn file_name(&self) -> String {
        let side = match self.side {
            LogoSide::Left => "left",
            LogoSide::Right => "right",
        };
        format!("logo_{}.{}", side, self.format.extension())
    }
}

/// Writer for media files (images)
#[derive(Debug, Clone, Copy)]
pub struct MediaWriter {
    max_image_bytes: usize,
}

impl MediaWriter {
    pub fn new(max_image_bytes: usize) -> Self {
        Self { max_image_bytes }
    }

    /// Collect the header logos that can be embedded.
    ///
    /// `boxes` holds the planned logo bounds per side; logos without a
    /// planned box are not embedded.
    pub fn collect(&self, header: &HeaderBlock, boxes: &[(LogoSide, Rect)]) -> Vec<EmbeddedImage> {
        let mut images = Vec::new();
        for (side, bounds) in boxes {
            if let Some(source) = header.logo(*side) {
                if let Some(image) = self.prepare(*side, source, *bounds) {
                    images.push(image);
                }
            }
        }
        images
    }

    /// Decode and check one logo, `None` when it has to be skipped
    pub fn prepare(&self, side: LogoSide, source: &ImageSource, bounds: Rect) -> Option<EmbeddedImage> {
        let decoded = match source.decode() {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::warn!(?side, error = %e, "logo left out of export: cannot decode");
                return None;
            }
        };

        if decoded.data.len() > self.max_image_bytes {
            tracing::warn!(
                ?side,
                size = decoded.data.len(),
                limit = self.max_image_bytes,
                "logo left out of export: too large"
            );
            return None;
        }

        let format = ImageFormat::from_bytes(&decoded.data);
        if !format.is_embeddable() {
            tracing::warn!(
                ?side,
                declared = %decoded.mime_type,
                detected = format.mime_type(),
                "logo left out of export: unsupported format"
            );
            return None;
        }

        let (width, height) = fit_into(format.dimensions(&decoded.data), bounds);
        Some(EmbeddedImage {
            side,
            format,
            data: decoded.data,
            width_emu: points_to_emu(width),
            height_emu: points_to_emu(height),
        })
    }
}

/// Largest size with the image's aspect ratio that fits the box
fn fit_into(pixels: Option<(u32, u32)>, bounds: Rect) -> (f32, f32) {
    match pixels {
        Some((w, h)) => {
            let scale = (bounds.width / w as f32).min(bounds.height / h as f32);
            (w as f32 * scale, h as f32 * scale)
        }
        None => (bounds.width, bounds.height),
    }
}

/// Generate a w:drawing element for an inline image
pub fn generate_inline_drawing(
    drawing_id: u32,
    rel_id: &str,
    width_emu: i64,
    height_emu: i64,
    name: &str,
    alt_text: Option<&str>,
) -> String {
    let alt = alt_text.unwrap_or(name);

    format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{w}" cy="{h}"/>"#,
            r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
            r#"<wp:docPr id="{id}" name="{name}" descr="{alt}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{w}" cy="{h}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#,
        ),
        w = width_emu,
        h = height_emu,
        id = drawing_id,
        name = escape_xml(name),
        alt = escape_xml(alt),
        rel = rel_id,
    )
}

/// Convert points to EMUs (English Metric Units)
/// 1 inch = 914400 EMUs, 1 point = 12700 EMUs
pub fn points_to_emu(points: f32) -> i64 {
    (points as f64 * 12700.0).round() as i64
}
