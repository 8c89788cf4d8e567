//! Snapshot persistence
//!
//! A single named slot holds the saved exam as JSON. Snapshots are written
//! inside an envelope identifying the format; a bare document written by
//! earlier versions is still accepted on load.

use crate::{Result, StoreError};
use doc_model::ExamDocument;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Envelope format identifier
pub const SNAPSHOT_FORMAT: &str = "exam-forge-snapshot";

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Name of the default storage slot
pub const DEFAULT_SLOT_NAME: &str = "examForge_savedData";

/// Default slot capacity, matching typical browser local storage quotas
pub const DEFAULT_SLOT_CAPACITY: usize = 5 * 1024 * 1024;

/// Saved snapshot wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotEnvelope {
    pub format: String,
    pub version: u32,
    /// RFC 3339 timestamp of the save
    pub saved_at: String,
    pub document: ExamDocument,
}

impl SnapshotEnvelope {
    pub fn new(document: ExamDocument) -> Self {
        Self {
            format: SNAPSHOT_FORMAT.to_string(),
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now().to_rfc3339(),
            document,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.format == SNAPSHOT_FORMAT && self.version <= SNAPSHOT_VERSION
    }
}

/// Serialize a document as a snapshot
pub fn encode_snapshot(document: &ExamDocument) -> Result<Vec<u8>> {
    let envelope = SnapshotEnvelope::new(document.clone());
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode a snapshot, accepting both the envelope and a bare document
pub fn decode_snapshot(data: &[u8]) -> Result<ExamDocument> {
    let value: serde_json::Value =
        serde_json::from_slice(data).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    let is_envelope = value
        .as_object()
        .map(|o| o.contains_key("format") && o.contains_key("document"))
        .unwrap_or(false);

    if is_envelope {
        let envelope: SnapshotEnvelope =
            serde_json::from_value(value).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        if !envelope.is_valid() {
            return Err(StoreError::InvalidFormat(format!(
                "{} version {}",
                envelope.format, envelope.version
            )));
        }
        Ok(envelope.document)
    } else {
        if !value.is_object() {
            return Err(StoreError::Corrupt("snapshot is not a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| StoreError::Corrupt(e.to_string()))
    }
}

/// A named place that holds one snapshot
pub trait StorageSlot {
    /// Slot name, for messages
    fn name(&self) -> &str;

    /// Read the stored bytes, `None` when the slot is empty
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the stored bytes.
    ///
    /// Fails with `CapacityExceeded` without touching the stored bytes when
    /// `data` is larger than the slot allows.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Remove the stored bytes
    fn clear(&mut self) -> Result<()>;
}

fn check_capacity(size: usize, capacity: Option<usize>) -> Result<()> {
    match capacity {
        Some(limit) if size > limit => Err(StoreError::CapacityExceeded { size, limit }),
        _ => Ok(()),
    }
}

/// Slot backed by a file on disk
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
    capacity: Option<usize>,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            capacity: None,
        }
    }

    /// Limit the size of a stored snapshot
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Default slot file inside a data directory
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", DEFAULT_SLOT_NAME))).with_capacity(DEFAULT_SLOT_CAPACITY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageSlot for FileSlot {
    fn name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_SLOT_NAME)
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        check_capacity(data.len(), self.capacity)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // Write next to the target and rename so a failed write never
        // leaves a truncated snapshot behind
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, data)?;
        if let Err(e) = std::fs::rename(&temp_path, &self.path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slot
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    data: Option<Vec<u8>>,
    capacity: Option<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: None,
            capacity: Some(capacity),
        }
    }

    /// Slot pre-filled with raw bytes
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Some(data.into()),
            capacity: None,
        }
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl StorageSlot for MemorySlot {
    fn name(&self) -> &str {
        DEFAULT_SLOT_NAME
    }

    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.data.clone())
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        check_capacity(data.len(), self.capacity)?;
        self.data = Some(data.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.data = None;
        Ok(())
    }
}

/// Saves and loads exam snapshots through a slot
#[derive(Debug, Clone)]
pub struct SnapshotStore<S: StorageSlot> {
    slot: S,
}

impl<S: StorageSlot> SnapshotStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn into_inner(self) -> S {
        self.slot
    }

    /// Save a snapshot of the document
    pub fn save(&mut self, document: &ExamDocument) -> Result<()> {
        let data = encode_snapshot(document)?;
        self.slot.write(&data)?;
        tracing::debug!(slot = self.slot.name(), bytes = data.len(), "snapshot saved");
        Ok(())
    }

    /// Load the saved document.
    ///
    /// Returns `Ok(None)` when nothing is saved and `Err(Corrupt)` when the
    /// stored bytes cannot be decoded.
    pub fn load(&self) -> Result<Option<ExamDocument>> {
        match self.slot.read()? {
            Some(data) => {
                let document = decode_snapshot(&data)?;
                tracing::debug!(slot = self.slot.name(), bytes = data.len(), "snapshot loaded");
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    /// Whether a snapshot is stored
    pub fn has_snapshot(&self) -> Result<bool> {
        Ok(self.slot.read()?.is_some())
    }
}
