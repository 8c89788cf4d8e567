//! Render Model - Layout plan to render conversion
//!
//! This crate converts a layout plan into render items for the interactive
//! preview and for the 1:1 print surface.

mod render_item;
mod presentation;
mod converter;
mod error;
pub mod html;

pub use render_item::*;
pub use presentation::*;
pub use converter::*;
pub use error::*;
