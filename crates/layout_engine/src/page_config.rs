//! Page geometry

use crate::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// Standard page sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// A4 (210mm x 297mm)
    A4,
    /// US Letter (8.5" x 11")
    Letter,
    /// Legal (8.5" x 14")
    Legal,
    /// Custom size in points
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Get the width and height in points
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.276, 841.89),  // 210mm x 297mm at 72 dpi
            PageSize::Letter => (612.0, 792.0), // 8.5" x 11" at 72 dpi
            PageSize::Legal => (612.0, 1008.0), // 8.5" x 14" at 72 dpi
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Page layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page size
    pub page_size: PageSize,
    /// Top margin in points
    pub margin_top: f32,
    /// Bottom margin in points
    pub margin_bottom: f32,
    /// Left margin in points
    pub margin_left: f32,
    /// Right margin in points
    pub margin_right: f32,
    /// Distance of the decorative border from the page edge
    pub border_inset: f32,
    /// Border stroke width in points
    pub border_width: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageConfig {
    /// A4 page with half-inch margins
    pub fn a4() -> Self {
        Self::with_size(PageSize::A4)
    }

    /// Letter page with half-inch margins
    pub fn letter() -> Self {
        Self::with_size(PageSize::Letter)
    }

    /// Page of the given size with half-inch margins
    pub fn with_size(page_size: PageSize) -> Self {
        Self {
            page_size,
            margin_top: 36.0,
            margin_bottom: 36.0,
            margin_left: 36.0,
            margin_right: 36.0,
            border_inset: 24.0,
            border_width: 1.5,
        }
    }

    pub fn page_width(&self) -> f32 {
        self.page_size.dimensions().0
    }

    pub fn page_height(&self) -> f32 {
        self.page_size.dimensions().1
    }

    /// Width available for content
    pub fn content_width(&self) -> f32 {
        self.page_width() - self.margin_left - self.margin_right
    }

    /// Height available for content
    pub fn content_height(&self) -> f32 {
        self.page_height() - self.margin_top - self.margin_bottom
    }

    /// Reject geometry that leaves no room for content
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_size.dimensions();
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "page size {}x{} is not positive",
                width, height
            )));
        }
        if self.content_width() < 72.0 || self.content_height() < 72.0 {
            return Err(LayoutError::InvalidPageSetup(format!(
                "margins leave a {:.0}x{:.0}pt content area",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_config_a4() {
        let config = PageConfig::a4();
        assert!((config.page_width() - 595.276).abs() < 0.01);
        assert!((config.content_width() - 523.276).abs() < 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_page_config_letter() {
        let config = PageConfig::letter();
        assert_eq!(config.content_width(), 540.0);
        assert_eq!(config.content_height(), 720.0);
    }

    #[test]
    fn test_margins_too_large() {
        let mut config = PageConfig::letter();
        config.margin_left = 300.0;
        config.margin_right = 300.0;
        assert!(matches!(config.validate(), Err(LayoutError::InvalidPageSetup(_))));
    }
}
