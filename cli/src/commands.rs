//! Toolbar commands
//!
//! Each command opens the working exam, runs one session operation and
//! writes results back only when the operation succeeded.

use crate::generator::{FixedGenerator, JsonFileGenerator};
use crate::session::{ExamSession, GenerationOutcome, Result, SessionError};
use crate::state::AppContext;
use doc_model::{Bucket, MarksStatus, QuestionId, ValidationError};
use layout_engine::{section_heading, LayoutPlan};
use render_model::{html::to_print_html, PresentationMode, PreviewRenderer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use store::{docx_filename, export_docx_with, write_package, ExportOptions};

/// Save the working exam to the snapshot slot
pub fn save(ctx: &AppContext) -> Result<String> {
    let mut session = ctx.open_session()?;
    let mut store = ctx.snapshot_store();
    Ok(session.save(&mut store)?.to_string())
}

/// Replace the working exam with the saved snapshot
pub fn load(ctx: &AppContext, confirmed: bool) -> Result<String> {
    if ctx.has_working_exam() && !confirmed {
        return Err(SessionError::ConfirmationRequired);
    }

    let mut session = ExamSession::default();
    let notice = session.load(&ctx.snapshot_store(), true)?;
    ctx.store_session(&session)?;
    Ok(notice.to_string())
}

/// Changes to one question; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionEdit {
    pub text: Option<String>,
    pub marks: Option<u32>,
    /// Replacement options, in display order
    pub options: Option<Vec<String>>,
    /// Remove the marks so the question is unscored
    pub unscored: bool,
}

/// Edit one question of the working exam.
///
/// The edit is stored even when it makes the exam invalid; remaining
/// issues are listed after the notice.
pub fn edit_question(ctx: &AppContext, id: &str, change: QuestionEdit) -> Result<String> {
    let mut session = ctx.open_session()?;
    let issues = session.update_question(&QuestionId::from(id), |question| {
        if let Some(text) = change.text {
            question.text = text;
        }
        if let Some(options) = change.options {
            question.options = options;
        }
        if change.unscored {
            question.marks = None;
        } else if let Some(marks) = change.marks {
            question.marks = Some(marks);
        }
    })?;
    ctx.store_session(&session)?;

    let mut notice = format!("Updated question {}", id);
    for issue in &issues {
        notice.push_str(&format!("
error: {}", issue));
    }
    Ok(notice)
}

/// Fill the working exam with generated content
pub async fn autofill(
    ctx: &AppContext,
    source: Option<&Path>,
    topic: &str,
    timeout: Duration,
) -> Result<String> {
    let mut session = ctx.open_session()?;

    let outcome = match source {
        Some(path) => {
            let generator = JsonFileGenerator::new(path);
            tracing::info!(path = %generator.path().display(), "generating from file");
            session.autofill(&generator, topic, timeout).await?
        }
        None => session.autofill(&FixedGenerator::sample(), topic, timeout).await?,
    };

    match outcome {
        GenerationOutcome::Applied(sections) => {
            ctx.store_session(&session)?;
            Ok(format!("Generated {}", sections.join(", ")))
        }
        GenerationOutcome::Stale => Ok("Content request was superseded".to_string()),
    }
}

/// Export the working exam as DOCX
pub fn export(ctx: &AppContext, out: Option<&Path>) -> Result<PathBuf> {
    let session = ctx.open_session()?;
    let doc = session.document();

    let engine = ctx.layout_engine()?;
    let options = ExportOptions::from(&ctx.settings.export);
    let bytes = export_docx_with(doc, &engine, &options)?;

    let path = output_path(out, ctx.output_dir(), docx_filename(&doc.header.exam_title));
    write_package(&bytes, &path)?;
    Ok(path)
}

/// Write the print surface of the working exam as HTML
pub fn print(ctx: &AppContext, out: Option<&Path>) -> Result<PathBuf> {
    let session = ctx.open_session()?;
    let doc = session.document();

    let plan = ctx.layout_engine()?.layout(doc)?;
    if !plan.failures().is_empty() {
        tracing::warn!(failures = plan.failures().len(), "printing an exam with failed blocks");
    }

    let model = PreviewRenderer::default().render(&plan, PresentationMode::Print);
    let html = to_print_html(&model)?;

    let file_name = Path::new(&docx_filename(&doc.header.exam_title))
        .with_extension("html")
        .to_string_lossy()
        .into_owned();
    let path = output_path(out, ctx.output_dir(), file_name);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, html)?;
    tracing::info!(path = %path.display(), pages = plan.page_count(), "print surface written");
    Ok(path)
}

/// Validation result of the working exam
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationError>,
    pub marks: MarksStatus,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            writeln!(f, "Exam is valid")?;
        }
        for issue in &self.issues {
            writeln!(f, "error: {}", issue)?;
        }
        match self.marks {
            MarksStatus::Matches(total) => write!(f, "Total marks: {}", total),
            MarksStatus::Mismatch { declared, computed } => write!(
                f,
                "Total marks: {} (questions add up to {})",
                declared, computed
            ),
        }
    }
}

/// Check the working exam
pub fn validate(ctx: &AppContext) -> Result<ValidationReport> {
    let session = ctx.open_session()?;
    let doc = session.document();
    Ok(ValidationReport {
        issues: doc.validation_issues(),
        marks: doc.marks_status(),
    })
}

/// Describe the layout of the working exam
pub fn layout(ctx: &AppContext, json: bool) -> Result<String> {
    let session = ctx.open_session()?;
    let plan = ctx.layout_engine()?.layout(session.document())?;

    if json {
        return Ok(serde_json::to_string_pretty(&plan)?);
    }

    let zoom = ctx.settings.preview.interactive_zoom;
    let preview = PreviewRenderer::default().render(&plan, PresentationMode::Interactive { zoom });
    let mut summary = plan_summary(&plan);
    for notice in &preview.notices {
        summary.push_str(&format!("\nnotice: {}", notice.message));
    }
    Ok(summary)
}

fn plan_summary(plan: &LayoutPlan) -> String {
    let mut lines = vec![format!("Pages: {}", plan.page_count())];
    for page in &plan.pages {
        let overflow = if page.overflows { " (overflows)" } else { "" };
        lines.push(format!("  page {}: {} blocks{}", page.index + 1, page.blocks.len(), overflow));
    }
    for bucket in Bucket::ALL {
        let numbers = plan.numbering(bucket);
        if numbers.is_empty() {
            continue;
        }
        lines.push(format!(
            "{}: {} questions, {} marks",
            section_heading(bucket),
            numbers.len(),
            plan.marks.bucket(bucket)
        ));
    }
    lines.push(format!("Total marks: {} (computed {})", plan.marks.declared, plan.marks.computed));
    lines.join("\n")
}

fn output_path(out: Option<&Path>, default_dir: PathBuf, file_name: String) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => default_dir.join(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{ExamDocument, Question};
    use store::{read_visible_paragraphs, AppSettings};
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn context(dir: &TempDir) -> AppContext {
        let mut settings = AppSettings::default();
        settings.export.output_dir = Some(dir.path().join("out"));
        AppContext::with_settings(dir.path(), settings)
    }

    fn write_exam(ctx: &AppContext, doc: ExamDocument) {
        ctx.store_session(&ExamSession::new(doc)).unwrap();
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut doc = ExamDocument::default_template();
        doc.header.school_name = "Saved Campus".into();
        write_exam(&ctx, doc.clone());

        assert_eq!(save(&ctx).unwrap(), "Exam saved successfully");

        write_exam(&ctx, ExamDocument::new());
        let err = load(&ctx, false).unwrap_err();
        assert!(matches!(err, SessionError::ConfirmationRequired));
        assert_eq!(ctx.open_session().unwrap().document(), &ExamDocument::new());

        load(&ctx, true).unwrap();
        assert_eq!(ctx.open_session().unwrap().document(), &doc);
    }

    #[test]
    fn test_load_without_snapshot() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let err = load(&ctx, true).unwrap_err();
        assert_eq!(err.user_message(), "No saved exam found");
        assert!(!ctx.has_working_exam());
    }

    #[test]
    fn test_edit_question_persists() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let id = ExamDocument::default_template().short_questions[0].id.to_string();

        let change = QuestionEdit {
            text: Some("Define molarity.".into()),
            marks: Some(4),
            ..Default::default()
        };
        assert_eq!(edit_question(&ctx, &id, change).unwrap(), format!("Updated question {}", id));

        let doc = ctx.open_session().unwrap().document().clone();
        assert_eq!(doc.short_questions[0].text, "Define molarity.");
        assert_eq!(doc.short_questions[0].marks, Some(4));
        assert!(matches!(load(&ctx, false), Err(SessionError::ConfirmationRequired)));
    }

    #[test]
    fn test_edit_question_reports_issues() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let id = ExamDocument::default_template().short_questions[2].id.to_string();

        let change = QuestionEdit {
            options: Some(vec!["one".into()]),
            unscored: true,
            marks: Some(9),
            ..Default::default()
        };
        let notice = edit_question(&ctx, &id, change).unwrap();
        assert!(notice.contains("\nerror: "));

        let doc = ctx.open_session().unwrap().document().clone();
        assert_eq!(doc.short_questions[2].marks, None);
        assert_eq!(doc.short_questions[2].options, vec!["one".to_string()]);

        let err = edit_question(&ctx, "nope", QuestionEdit::default()).unwrap_err();
        assert!(matches!(err, SessionError::UnknownQuestion(_)));
    }

    #[tokio::test]
    async fn test_autofill_from_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let source = dir.path().join("generated.json");
        std::fs::write(
            &source,
            r#"{"shortQuestions": [{"id": "s100", "text": "Define mole.", "marks": 5}]}"#,
        )
        .unwrap();

        let notice = autofill(&ctx, Some(source.as_path()), "", TIMEOUT).await.unwrap();
        assert_eq!(notice, "Generated shortQuestions");

        let doc = ctx.open_session().unwrap().document().clone();
        assert_eq!(doc.short_questions.len(), 1);
        assert_eq!(doc.mcqs.len(), 10);
    }

    #[tokio::test]
    async fn test_autofill_failure_keeps_working_exam() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        write_exam(&ctx, ExamDocument::default_template());
        let source = dir.path().join("empty.json");
        std::fs::write(&source, "null").unwrap();

        let err = autofill(&ctx, Some(source.as_path()), "", TIMEOUT).await.unwrap_err();
        assert_eq!(err.user_message(), "Could not generate content");
        assert_eq!(ctx.open_session().unwrap().document(), &ExamDocument::default_template());
    }

    #[test]
    fn test_export_uses_title_file_name() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let path = export(&ctx, None).unwrap();
        assert_eq!(path, dir.path().join("out").join("Terminal_Examination_2023-24.docx"));

        let paragraphs = read_visible_paragraphs(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(paragraphs[0], "GOVERNMENT BOYS HIGHER SECONDARY SCHOOL HAJI JUNEJO");
    }

    #[test]
    fn test_export_invalid_exam_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut doc = ExamDocument::default_template();
        doc.mcqs.push(Question::new("Missing options").with_id("m99"));
        write_exam(&ctx, doc);

        let err = export(&ctx, None).unwrap_err();
        assert!(err.user_message().starts_with("Fix the exam before exporting"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_print_writes_html() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let out = dir.path().join("print.html");

        let path = print(&ctx, Some(out.as_path())).unwrap();
        assert_eq!(path, out);
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("@page"));
        assert!(html.contains("SECTION A"));
    }

    #[test]
    fn test_validate_report() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let report = validate(&ctx).unwrap();
        assert!(report.is_valid());
        assert_eq!(
            report.to_string(),
            "Exam is valid\nTotal marks: 100 (questions add up to 115)"
        );

        let mut doc = ExamDocument::default_template();
        doc.mcqs[2].options.clear();
        write_exam(&ctx, doc);
        let report = validate(&ctx).unwrap();
        assert!(!report.is_valid());
        assert!(report.to_string().starts_with("error: "));
    }

    #[test]
    fn test_layout_summary() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let summary = layout(&ctx, false).unwrap();
        assert!(summary.starts_with("Pages: "));
        assert!(summary.contains("SECTION A: MULTIPLE CHOICE QUESTIONS: 10 questions, 20 marks"));
        assert!(summary.contains("Total marks: 100 (computed 115)"));
        assert!(summary.contains("notice: Total marks shows 100 but the questions add up to 115"));

        let json: serde_json::Value = serde_json::from_str(&layout(&ctx, true).unwrap()).unwrap();
        assert!(json["pages"].is_array());
        assert_eq!(json["marks"]["declared"], 100);
    }
}
