//! Layout Engine - Numbering, text measurement and pagination
//!
//! This crate turns an exam document into a paginated layout plan. The plan
//! is the single source of numbering, lettering and page breaks for both the
//! on-screen preview and the DOCX exporter.

mod error;
mod numbering;
mod metrics;
mod page_config;
mod plan;
mod paginator;
mod engine;

pub use error::*;
pub use numbering::*;
pub use metrics::*;
pub use page_config::*;
pub use plan::*;
pub use paginator::*;
pub use engine::*;
