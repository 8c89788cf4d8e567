//! Content generators
//!
//! A generator is asked once for `(subject, grade, topic)` and answers with
//! the sections it filled, or nothing.

use doc_model::{template, PartialExamDocument};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generated content is not a partial exam: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Content service failed: {0}")]
    Service(String),

    #[error("Content request timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

pub type GenerationResult = std::result::Result<Option<PartialExamDocument>, GenerationError>;

/// A one-shot content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject: String,
    pub grade: String,
    pub topic: String,
}

/// Source of generated exam content
pub trait ContentGenerator {
    /// Generate content for a subject and grade.
    ///
    /// `Ok(None)` means the generator had nothing to offer.
    async fn generate(&self, subject: &str, grade: &str, topic: &str) -> GenerationResult;
}

/// Reads generated content from a JSON file holding a partial document
#[derive(Debug, Clone)]
pub struct JsonFileGenerator {
    path: PathBuf,
}

impl JsonFileGenerator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentGenerator for JsonFileGenerator {
    async fn generate(&self, subject: &str, grade: &str, topic: &str) -> GenerationResult {
        tracing::debug!(path = %self.path.display(), subject, grade, topic, "reading generated content");

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let partial: Option<PartialExamDocument> = serde_json::from_str(&content)?;
        Ok(partial.filter(|p| !p.is_empty()))
    }
}

/// Answers every request with the same result
#[derive(Debug, Clone)]
pub struct FixedGenerator {
    result: std::result::Result<Option<PartialExamDocument>, String>,
}

impl FixedGenerator {
    pub fn new(partial: Option<PartialExamDocument>) -> Self {
        Self { result: Ok(partial) }
    }

    /// A generator that always fails with a service error
    #[cfg(test)]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            result: Err(message.into()),
        }
    }

    /// Sample questions and instructions of the built-in template
    pub fn sample() -> Self {
        let exam = template::default_exam();
        Self::new(Some(PartialExamDocument {
            mcqs: Some(exam.mcqs),
            short_questions: Some(exam.short_questions),
            long_questions: Some(exam.long_questions),
            mcq_instruction: Some(exam.mcq_instruction),
            short_instruction: Some(exam.short_instruction),
            long_instruction: Some(exam.long_instruction),
            ..Default::default()
        }))
    }
}

impl ContentGenerator for FixedGenerator {
    async fn generate(&self, subject: &str, grade: &str, topic: &str) -> GenerationResult {
        tracing::debug!(subject, grade, topic, "fixed content requested");
        self.result.clone().map_err(GenerationError::Service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::Bucket;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("generated.json");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_json_file_partial() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{"mcqs": [{"id": "g1", "text": "Atomic number of carbon?", "options": ["4", "6", "8", "12"], "marks": 1}],
                "mcqInstruction": "Choose the correct answer:"}"#,
        );

        let partial = JsonFileGenerator::new(&path)
            .generate("CHEMISTRY", "11th", "")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(partial.questions(Bucket::MultipleChoice).unwrap().len(), 1);
        assert_eq!(partial.mcq_instruction.as_deref(), Some("Choose the correct answer:"));
        assert!(partial.header.is_none());
        assert!(partial.short_questions.is_none());
    }

    #[tokio::test]
    async fn test_json_file_without_content() {
        let dir = TempDir::new().unwrap();

        for content in ["", "  \n", "null", "{}"] {
            let path = write(&dir, content);
            let result = JsonFileGenerator::new(&path).generate("PHYSICS", "9th", "").await;
            assert!(matches!(result, Ok(None)), "content {:?}", content);
        }
    }

    #[tokio::test]
    async fn test_json_file_errors() {
        let dir = TempDir::new().unwrap();

        let missing = JsonFileGenerator::new(dir.path().join("absent.json"));
        assert!(matches!(missing.generate("", "", "").await, Err(GenerationError::Io(_))));

        let path = write(&dir, r#"{"mcqs": "not a list"}"#);
        let malformed = JsonFileGenerator::new(&path);
        assert!(matches!(malformed.generate("", "", "").await, Err(GenerationError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_fixed_generator() {
        let sample = FixedGenerator::sample().generate("", "", "").await.unwrap().unwrap();
        assert_eq!(sample.mcqs.as_ref().map(Vec::len), Some(10));
        assert!(sample.header.is_none());
        assert!(sample.settings.is_none());

        let empty = FixedGenerator::new(None).generate("", "", "").await.unwrap();
        assert!(empty.is_none());

        let failing = FixedGenerator::failing("quota exhausted").generate("", "", "").await;
        assert!(matches!(failing, Err(GenerationError::Service(m)) if m == "quota exhausted"));
    }
}
