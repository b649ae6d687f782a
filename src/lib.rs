//! ABC Score Widget WASM Module
//!
//! This is the WASM module for the Streamlit ABC score component.
//! It renders ABC notation as sheet music via abcjs and optionally drives
//! synthesized playback with a visual cursor.

pub mod audio;
pub mod error;
pub mod models;
pub mod render;
pub mod widget;
pub mod api;

// Re-export commonly used types
pub use audio::{ConnectAction, ConnectionSequencer, ConnectionState};
pub use error::{Result, WidgetError};
pub use models::config::{RenderRequest, Theme};
pub use widget::{Platform, ScoreWidget, TimerKind};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).expect("failed to initialize logger");

    log::info!("ABC score widget WASM module initialized");
}
