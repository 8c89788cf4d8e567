//! Exam header metadata

use crate::ImageSource;
use serde::{Deserialize, Serialize};

/// Which side of the header a logo sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogoSide {
    Left,
    Right,
}

/// Header block printed at the top of the first page.
///
/// `total_marks` is advisory: it is displayed as entered and compared
/// against the sum of question marks only for reporting. A blank campus
/// or logo is stored as entered and treated as absent by the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamHeader {
    pub school_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campus: Option<String>,
    pub exam_title: String,
    pub subject: String,
    pub date: String,
    pub time: String,
    pub class_grade: String,
    pub total_marks: u32,
    #[serde(rename = "logoUrl", skip_serializing_if = "Option::is_none")]
    pub logo_left: Option<ImageSource>,
    #[serde(rename = "logoRightUrl", skip_serializing_if = "Option::is_none")]
    pub logo_right: Option<ImageSource>,
}

impl ExamHeader {
    /// Get the logo for a side, ignoring a blank source
    pub fn logo(&self, side: LogoSide) -> Option<&ImageSource> {
        let logo = match side {
            LogoSide::Left => self.logo_left.as_ref(),
            LogoSide::Right => self.logo_right.as_ref(),
        };
        logo.filter(|source| !source.is_blank())
    }

    /// Campus line, if it has any text
    pub fn campus(&self) -> Option<&str> {
        self.campus.as_deref().filter(|campus| !campus.trim().is_empty())
    }

    /// Labelled info fields in display order
    pub fn info_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Subject", self.subject.clone()),
            ("Class", self.class_grade.clone()),
            ("Date", self.date.clone()),
            ("Time", self.time.clone()),
            ("Total Marks", self.total_marks.to_string()),
        ]
    }
}
