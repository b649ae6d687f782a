//! ABC Score Widget WASM API
//!
//! This module provides the JavaScript-facing surface of the widget. It
//! includes shared utilities for serialization, validation, and error
//! handling, the raw bindings to the abcjs and Streamlit globals, and the
//! exported widget class wired to the real DOM.
//!
//! # Module Structure
//!
//! - `helpers`: serialization, validation, error handling, and logging
//! - `bindings`: `extern "C"` imports for abcjs and the Streamlit bridge
//! - `cursor`: playback cursor callbacks that move the note highlight
//! - `dom`: the [`crate::widget::Platform`] implementation against web-sys
//! - `widget`: the exported `AbcScoreWidget` class and free functions

pub mod helpers;
pub mod bindings;
pub mod cursor;
pub mod dom;
pub mod widget;

pub use widget::AbcScoreWidget;
