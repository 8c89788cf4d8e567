//! Presentation scales of the preview

use serde::{Deserialize, Serialize};

/// Zoom of the interactive preview when none is configured
pub const DEFAULT_INTERACTIVE_ZOOM: f64 = 0.75;

/// How a layout plan is presented
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum PresentationMode {
    /// Scaled-down on-screen view
    Interactive { zoom: f64 },
    /// 1:1 view handed to the print facility
    Print,
}

impl Default for PresentationMode {
    fn default() -> Self {
        Self::interactive()
    }
}

impl PresentationMode {
    /// Interactive view at the default zoom
    pub fn interactive() -> Self {
        PresentationMode::Interactive {
            zoom: DEFAULT_INTERACTIVE_ZOOM,
        }
    }

    /// Select the mode from the host's print-mode signal
    pub fn from_print_flag(print_mode: bool) -> Self {
        if print_mode {
            PresentationMode::Print
        } else {
            Self::interactive()
        }
    }

    /// Factor applied to plan coordinates
    pub fn scale(&self) -> f64 {
        match self {
            PresentationMode::Interactive { zoom } if zoom.is_finite() && *zoom > 0.0 => *zoom,
            PresentationMode::Interactive { .. } => DEFAULT_INTERACTIVE_ZOOM,
            PresentationMode::Print => 1.0,
        }
    }

    pub fn is_print(&self) -> bool {
        matches!(self, PresentationMode::Print)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_print_flag() {
        assert_eq!(PresentationMode::from_print_flag(true), PresentationMode::Print);
        assert_eq!(
            PresentationMode::from_print_flag(false),
            PresentationMode::Interactive { zoom: 0.75 }
        );
    }

    #[test]
    fn test_scale() {
        assert_eq!(PresentationMode::Print.scale(), 1.0);
        assert_eq!(PresentationMode::Interactive { zoom: 0.5 }.scale(), 0.5);
        assert_eq!(PresentationMode::Interactive { zoom: -1.0 }.scale(), 0.75);
    }
}
