//! Exam session
//!
//! The session owns the working exam document. Every toolbar command runs
//! against it and either succeeds completely or leaves the document as it
//! was.

use crate::generator::{ContentGenerator, GenerationError, GenerationRequest, GenerationResult};
use doc_model::{ExamDocument, Question, QuestionId, ValidationError};
use layout_engine::LayoutError;
use render_model::RenderError;
use store::{DocxError, SnapshotStore, StorageSlot, StoreError};
use std::time::Duration;
use thiserror::Error;

pub const SAVED_NOTICE: &str = "Exam saved successfully";
pub const LOADED_NOTICE: &str = "Exam loaded successfully";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A content request is already in progress")]
    GenerationInFlight,

    #[error("Content generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("The content generator returned nothing")]
    NothingGenerated,

    #[error("No snapshot in the storage slot")]
    NoSnapshot,

    #[error("Loading would replace the current exam and was not confirmed")]
    ConfirmationRequired,

    #[error("No question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("Invalid exam: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Export error: {0}")]
    Export(#[from] DocxError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    /// Message shown to the user
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Store(e) if e.is_capacity_exceeded() => {
                "Storage limit exceeded. Try removing large logo images.".to_string()
            }
            SessionError::Store(StoreError::Corrupt(_) | StoreError::InvalidFormat(_)) => {
                "The file might be corrupted".to_string()
            }
            SessionError::NoSnapshot => "No saved exam found".to_string(),
            SessionError::Generation(_) | SessionError::NothingGenerated => {
                "Could not generate content".to_string()
            }
            SessionError::GenerationInFlight => "Content is already being generated".to_string(),
            SessionError::ConfirmationRequired => {
                "Loading replaces the current exam. Confirm to continue.".to_string()
            }
            SessionError::Validation(e)
            | SessionError::Export(DocxError::Validation(e))
            | SessionError::Layout(LayoutError::Validation(e)) => {
                format!("Fix the exam before exporting: {}", e)
            }
            SessionError::Export(DocxError::BlockFailed { bucket, number, .. }) => {
                format!("{} question {} could not be laid out", bucket, number)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Claim on the single in-flight content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    id: u64,
    request: GenerationRequest,
}

impl GenerationTicket {
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// What happened to a finished content request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Sections merged into the document
    Applied(Vec<&'static str>),
    /// The ticket no longer matches the in-flight request
    Stale,
}

/// The working exam document
#[derive(Debug, Clone)]
pub struct ExamSession {
    document: ExamDocument,
    dirty: bool,
    in_flight: Option<u64>,
    next_ticket: u64,
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new(ExamDocument::default_template())
    }
}

impl ExamSession {
    pub fn new(document: ExamDocument) -> Self {
        Self {
            document,
            dirty: false,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn document(&self) -> &ExamDocument {
        &self.document
    }

    /// Whether the document changed since it was opened, saved or loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a content request is pending
    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply a user edit and mark the document modified.
    ///
    /// The edit is kept even when it leaves the document invalid. The
    /// returned issues are what currently blocks export.
    pub fn edit<F>(&mut self, edit: F) -> Vec<ValidationError>
    where
        F: FnOnce(&mut ExamDocument),
    {
        edit(&mut self.document);
        self.dirty = true;
        self.document.validation_issues()
    }

    /// Edit one question, found by id in any bucket
    pub fn update_question<F>(&mut self, id: &QuestionId, edit: F) -> Result<Vec<ValidationError>>
    where
        F: FnOnce(&mut Question),
    {
        let question = self
            .document
            .find_question_mut(id)
            .ok_or_else(|| SessionError::UnknownQuestion(id.clone()))?;
        edit(question);
        self.dirty = true;
        tracing::debug!(id = %id, "question edited");
        Ok(self.document.validation_issues())
    }

    /// Save a snapshot of the document
    pub fn save<S: StorageSlot>(&mut self, store: &mut SnapshotStore<S>) -> Result<&'static str> {
        store.save(&self.document)?;
        self.dirty = false;
        tracing::info!(slot = store.slot().name(), "exam saved");
        Ok(SAVED_NOTICE)
    }

    /// Replace the document with the saved snapshot.
    ///
    /// A modified document is only replaced when `confirmed` is set. On any
    /// error the document is left unchanged.
    pub fn load<S: StorageSlot>(&mut self, store: &SnapshotStore<S>, confirmed: bool) -> Result<&'static str> {
        if self.dirty && !confirmed {
            return Err(SessionError::ConfirmationRequired);
        }

        let document = store.load()?.ok_or(SessionError::NoSnapshot)?;
        self.document = document;
        self.dirty = false;
        tracing::info!(slot = store.slot().name(), "exam loaded");
        Ok(LOADED_NOTICE)
    }

    /// Start a content request for the header's subject and class
    pub fn begin_generation(&mut self, topic: &str) -> Result<GenerationTicket> {
        if self.in_flight.is_some() {
            return Err(SessionError::GenerationInFlight);
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(id);

        let request = GenerationRequest {
            subject: self.document.header.subject.clone(),
            grade: self.document.header.class_grade.clone(),
            topic: topic.to_string(),
        };
        tracing::info!(ticket = id, subject = %request.subject, grade = %request.grade, "content requested");
        Ok(GenerationTicket { id, request })
    }

    /// Drop the in-flight request; its result will be ignored
    pub fn cancel_generation(&mut self) {
        if let Some(id) = self.in_flight.take() {
            tracing::info!(ticket = id, "content request cancelled");
        }
    }

    /// Finish a content request.
    ///
    /// Results for a ticket other than the in-flight one are ignored. An
    /// empty or failed result leaves the document untouched, as does a
    /// partial that fails validation.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: GenerationResult,
    ) -> Result<GenerationOutcome> {
        if self.in_flight != Some(ticket.id) {
            tracing::warn!(ticket = ticket.id, "ignoring stale content result");
            return Ok(GenerationOutcome::Stale);
        }
        self.in_flight = None;

        let partial = result?.ok_or(SessionError::NothingGenerated)?;
        let sections = partial.present_sections();
        self.document.merge(partial)?;
        self.dirty = true;

        tracing::info!(ticket = ticket.id, sections = ?sections, "generated content merged");
        Ok(GenerationOutcome::Applied(sections))
    }

    /// Request content and merge the result.
    ///
    /// A request that outlives `timeout` is cancelled.
    pub async fn autofill<G: ContentGenerator>(
        &mut self,
        generator: &G,
        topic: &str,
        timeout: Duration,
    ) -> Result<GenerationOutcome> {
        let ticket = self.begin_generation(topic)?;
        let request = ticket.request().clone();
        let pending = generator.generate(&request.subject, &request.grade, &request.topic);

        match tokio::time::timeout(timeout, pending).await {
            Ok(result) => self.complete_generation(ticket, result),
            Err(_) => {
                self.cancel_generation();
                Err(GenerationError::TimedOut(timeout).into())
            }
        }
    }
}
