//! Error types for storage operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot of {size} bytes exceeds the storage limit of {limit} bytes")]
    CapacityExceeded { size: usize, limit: usize },

    #[error("Saved snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}

impl StoreError {
    /// Whether the failure is the storage slot running out of room
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, StoreError::CapacityExceeded { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
