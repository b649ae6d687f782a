//! Models module for the ABC score widget
//!
//! This module contains the host-facing data structures: the per-update
//! render request with its Streamlit theme block, and the built-in catalog
//! of example tunes.

pub mod config;
pub mod tunes;

// Re-export commonly used types
pub use config::{RenderRequest, Theme, DEFAULT_HEIGHT_PX, DEFAULT_SCALE};
pub use tunes::{example_names, example_notation};
