//! Export file naming

use regex_lite::Regex;

const FALLBACK_FILENAME: &str = "exam.docx";

/// Deterministic file name for an exported exam.
///
/// Whitespace runs become `_`, characters that are not allowed in file
/// names on common platforms are dropped, and an empty result falls back
/// to `exam.docx`.
pub fn docx_filename(title: &str) -> String {
    let whitespace = Regex::new(r"\s+").ok();
    // Tab, line feed and carriage return are left for the whitespace pass
    let invalid = Regex::new(r#"[<>:"/\\|?*\x00-\x08\x0B\x0C\x0E-\x1F\x7F]"#).ok();

    let cleaned = match &invalid {
        Some(re) => re.replace_all(title.trim(), "").into_owned(),
        None => title.trim().to_string(),
    };
    let joined = match &whitespace {
        Some(re) => re.replace_all(cleaned.trim(), "_").into_owned(),
        None => cleaned.trim().to_string(),
    };
    let stem = joined.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{}.docx", stem)
    }
}
