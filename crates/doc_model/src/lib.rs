//! Document Model - Canonical exam document structure
//!
//! This crate provides the serializable exam document: header metadata,
//! styling settings, the three question buckets with their instruction
//! lines, validation of model invariants and typed partial documents for
//! shallow merges.

mod error;
mod question;
mod header;
mod settings;
mod image;
mod document;
mod partial;
mod validation;
mod serde_helpers;
pub mod template;

pub use error::*;
pub use question::*;
pub use header::*;
pub use settings::*;
pub use image::*;
pub use document::*;
pub use partial::*;
pub use validation::*;
