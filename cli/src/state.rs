//! Application state management

use crate::session::{ExamSession, Result};
use doc_model::ExamDocument;
use layout_engine::LayoutEngine;
use std::path::{Path, PathBuf};
use store::{AppSettings, FileSlot, SettingsManager, SnapshotStore};

/// File name of the working exam inside the data directory
pub const WORKING_EXAM_FILE: &str = "exam.json";

/// Paths and settings shared by every command
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Directory holding the snapshot slot, settings and working exam
    pub data_dir: PathBuf,
    /// Working exam document
    pub exam_path: PathBuf,
    pub settings: AppSettings,
}

impl AppContext {
    /// Load settings and resolve paths
    pub async fn open(
        data_dir: PathBuf,
        settings_path: Option<PathBuf>,
        exam_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut manager = match settings_path {
            Some(path) => SettingsManager::with_path(path),
            None => SettingsManager::new(data_dir.clone()),
        };
        let settings = manager.load().await?.clone();
        tracing::debug!(path = %manager.settings_path().display(), "settings loaded");

        let exam_path = exam_path.unwrap_or_else(|| data_dir.join(WORKING_EXAM_FILE));
        Ok(Self {
            data_dir,
            exam_path,
            settings,
        })
    }

    /// Context for a data directory with explicit settings
    #[cfg(test)]
    pub fn with_settings(data_dir: &Path, settings: AppSettings) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            exam_path: data_dir.join(WORKING_EXAM_FILE),
            settings,
        }
    }

    /// The snapshot slot the toolbar saves to
    pub fn snapshot_store(&self) -> SnapshotStore<FileSlot> {
        let storage = &self.settings.storage;
        let slot = FileSlot::new(storage.resolve_slot_path(&self.data_dir)).with_capacity(storage.capacity_bytes);
        SnapshotStore::new(slot)
    }

    fn working_store(&self) -> SnapshotStore<FileSlot> {
        SnapshotStore::new(FileSlot::new(&self.exam_path))
    }

    /// Whether a working exam exists on disk
    pub fn has_working_exam(&self) -> bool {
        self.exam_path.exists()
    }

    /// Open the working exam, starting from the template when there is none
    pub fn open_session(&self) -> Result<ExamSession> {
        let document = self
            .working_store()
            .load()?
            .unwrap_or_else(ExamDocument::default_template);
        Ok(ExamSession::new(document))
    }

    /// Persist the working exam
    pub fn store_session(&self, session: &ExamSession) -> Result<()> {
        self.working_store().save(session.document())?;
        Ok(())
    }

    /// Layout engine for the configured page geometry
    pub fn layout_engine(&self) -> Result<LayoutEngine> {
        let config = self.settings.layout.page_config();
        config.validate()?;
        Ok(LayoutEngine::new(config))
    }

    /// Directory exported and printed files go to
    pub fn output_dir(&self) -> PathBuf {
        self.settings
            .export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_with_defaults() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::open(dir.path().to_path_buf(), None, None).await.unwrap();

        assert_eq!(ctx.settings, AppSettings::default());
        assert_eq!(ctx.exam_path, dir.path().join("exam.json"));
        assert_eq!(
            ctx.snapshot_store().slot().path(),
            dir.path().join("examForge_savedData.json")
        );
        assert!(!ctx.has_working_exam());
    }

    #[tokio::test]
    async fn test_open_with_settings_file() {
        let dir = TempDir::new().unwrap();
        let settings_path = dir.path().join("custom.json");
        std::fs::write(
            &settings_path,
            r#"{"storage": {"slot_path": "slots/exam.json"}, "export": {"output_dir": "/tmp/out"}}"#,
        )
        .unwrap();

        let ctx = AppContext::open(dir.path().to_path_buf(), Some(settings_path), None)
            .await
            .unwrap();
        assert_eq!(ctx.output_dir(), PathBuf::from("/tmp/out"));
        assert_eq!(
            ctx.snapshot_store().slot().path(),
            dir.path().join("slots").join("exam.json")
        );
    }

    #[test]
    fn test_working_exam_roundtrip() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::with_settings(dir.path(), AppSettings::default());

        let session = ctx.open_session().unwrap();
        assert_eq!(session.document(), &ExamDocument::default_template());

        ctx.store_session(&session).unwrap();
        assert!(ctx.has_working_exam());
        assert_eq!(ctx.open_session().unwrap().document(), session.document());
    }
}
