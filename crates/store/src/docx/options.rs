//! Export options

use crate::settings::{ExportSettings, PaginationMode};

/// Options controlling DOCX export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// How planned page breaks are carried into the file
    pub pagination: PaginationMode,
    /// Decoded logos larger than this many bytes are left out
    pub max_image_bytes: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::from(&ExportSettings::default())
    }
}

impl From<&ExportSettings> for ExportOptions {
    fn from(settings: &ExportSettings) -> Self {
        Self {
            pagination: settings.pagination,
            max_image_bytes: settings.max_image_bytes,
        }
    }
}

impl ExportOptions {
    pub fn with_pagination(mut self, pagination: PaginationMode) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }
}
