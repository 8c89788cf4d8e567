//! Application settings management
//!
//! This module provides settings persistence, loading, and updating
//! for the Exam Forge application.

use crate::snapshot::{DEFAULT_SLOT_CAPACITY, DEFAULT_SLOT_NAME};
use crate::Result;
use layout_engine::{PageConfig, PageSize};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application settings container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Snapshot slot settings
    pub storage: StorageSettings,
    /// Document export settings
    pub export: ExportSettings,
    /// Preview settings
    pub preview: PreviewSettings,
    /// Page geometry used for layout
    pub layout: LayoutSettings,
}

/// Snapshot slot settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    /// Snapshot file; relative paths resolve against the data directory
    pub slot_path: PathBuf,
    /// Largest snapshot the slot accepts, in bytes
    pub capacity_bytes: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            slot_path: PathBuf::from(format!("{}.json", DEFAULT_SLOT_NAME)),
            capacity_bytes: DEFAULT_SLOT_CAPACITY,
        }
    }
}

impl StorageSettings {
    /// Snapshot file path inside a data directory
    pub fn resolve_slot_path(&self, data_dir: &Path) -> PathBuf {
        if self.slot_path.is_absolute() {
            self.slot_path.clone()
        } else {
            data_dir.join(&self.slot_path)
        }
    }
}

/// How exported documents reproduce the layout plan's page breaks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaginationMode {
    /// Force a page break wherever the plan starts a new page
    #[default]
    Planned,
    /// Only keep-together hints; the word processor picks page breaks
    Flow,
}

/// Document export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory exported files are written to (current directory when unset)
    pub output_dir: Option<PathBuf>,
    pub pagination: PaginationMode,
    /// Decoded logo images larger than this are left out of exports
    pub max_image_bytes: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            pagination: PaginationMode::Planned,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Preview settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewSettings {
    /// Zoom of the interactive preview
    pub interactive_zoom: f64,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            interactive_zoom: 0.75,
        }
    }
}

/// Page geometry used for layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    pub page_size: PageSize,
    /// Margins in points
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        let config = PageConfig::default();
        Self {
            page_size: config.page_size,
            margin_top: config.margin_top,
            margin_bottom: config.margin_bottom,
            margin_left: config.margin_left,
            margin_right: config.margin_right,
        }
    }
}

impl LayoutSettings {
    /// Page configuration for the layout engine
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            page_size: self.page_size,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
            ..PageConfig::with_size(self.page_size)
        }
    }
}

/// Settings manager for loading, saving, and updating application settings
pub struct SettingsManager {
    /// Path to the settings file
    settings_path: PathBuf,
    /// Current settings (cached)
    current: AppSettings,
}

impl SettingsManager {
    /// Create a new settings manager with the given app data directory
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self::with_path(app_data_dir.join("settings.json"))
    }

    /// Create a settings manager for an explicit settings file
    pub fn with_path(settings_path: PathBuf) -> Self {
        Self {
            settings_path,
            current: AppSettings::default(),
        }
    }

    /// Get the path to the settings file
    pub fn settings_path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Load settings from disk, or return defaults if file doesn't exist
    pub async fn load(&mut self) -> Result<&AppSettings> {
        if tokio::fs::try_exists(&self.settings_path).await? {
            let content = tokio::fs::read_to_string(&self.settings_path).await?;
            self.current = Self::parse_or_default(&content);
        } else {
            self.current = AppSettings::default();
        }
        Ok(&self.current)
    }

    /// Load settings synchronously (for use during startup)
    pub fn load_sync(&mut self) -> Result<&AppSettings> {
        if self.settings_path.exists() {
            let content = std::fs::read_to_string(&self.settings_path)?;
            self.current = Self::parse_or_default(&content);
        } else {
            self.current = AppSettings::default();
        }
        Ok(&self.current)
    }

    fn parse_or_default(content: &str) -> AppSettings {
        match serde_json::from_str::<AppSettings>(content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Failed to parse settings file, using defaults: {}", e);
                AppSettings::default()
            }
        }
    }

    /// Save current settings to disk
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        tokio::fs::write(&self.settings_path, content).await?;
        Ok(())
    }

    /// Save settings synchronously
    pub fn save_sync(&self) -> Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.current)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &AppSettings {
        &self.current
    }

    /// Update settings and save to disk
    pub async fn update(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save().await
    }

    /// Update settings synchronously
    pub fn update_sync(&mut self, settings: AppSettings) -> Result<()> {
        self.current = settings;
        self.save_sync()
    }

    /// Reset settings to defaults and save
    pub fn reset_sync(&mut self) -> Result<&AppSettings> {
        self.current = AppSettings::default();
        self.save_sync()?;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();

        assert_eq!(
            settings.storage.slot_path,
            PathBuf::from("examForge_savedData.json")
        );
        assert_eq!(settings.storage.capacity_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.export.pagination, PaginationMode::Planned);
        assert_eq!(settings.export.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.preview.interactive_zoom, 0.75);
        assert_eq!(settings.layout.page_config(), PageConfig::a4());
    }

    #[test]
    fn test_partial_settings_file() {
        let settings: AppSettings =
            serde_json::from_str(r#"{"export":{"pagination":"flow"},"layout":{"page_size":"letter"}}"#)
                .unwrap();
        assert_eq!(settings.export.pagination, PaginationMode::Flow);
        assert_eq!(settings.export.max_image_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.layout.page_config().page_width(), 612.0);
        assert_eq!(settings.preview, PreviewSettings::default());
    }

    #[test]
    fn test_resolve_slot_path() {
        let storage = StorageSettings::default();
        assert_eq!(
            storage.resolve_slot_path(Path::new("/data")),
            PathBuf::from("/data/examForge_savedData.json")
        );
    }

    #[test]
    fn test_settings_manager_load_save_sync() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        // Load should return defaults when no file exists
        let settings = manager.load_sync().unwrap();
        assert_eq!(settings, &AppSettings::default());

        let mut new_settings = AppSettings::default();
        new_settings.preview.interactive_zoom = 0.5;
        new_settings.export.pagination = PaginationMode::Flow;
        manager.update_sync(new_settings).unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load_sync().unwrap();
        assert_eq!(loaded.preview.interactive_zoom, 0.5);
        assert_eq!(loaded.export.pagination, PaginationMode::Flow);
    }

    #[test]
    fn test_unparsable_settings_fall_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut manager = SettingsManager::with_path(path);
        assert_eq!(manager.load_sync().unwrap(), &AppSettings::default());

        let mut changed = AppSettings::default();
        changed.storage.capacity_bytes = 1;
        manager.update_sync(changed).unwrap();
        assert_eq!(manager.reset_sync().unwrap(), &AppSettings::default());
    }

    #[tokio::test]
    async fn test_settings_manager_async() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path().to_path_buf());

        manager.load().await.unwrap();

        let mut new_settings = AppSettings::default();
        new_settings.storage.capacity_bytes = 1024;
        manager.update(new_settings).await.unwrap();

        let mut manager2 = SettingsManager::new(temp_dir.path().to_path_buf());
        let loaded = manager2.load().await.unwrap();
        assert_eq!(loaded.storage.capacity_bytes, 1024);
    }
}
