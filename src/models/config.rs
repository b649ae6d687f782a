//! Host-supplied configuration for one render cycle
//!
//! Streamlit re-sends the full argument object on every render event, so a
//! `RenderRequest` is parsed fresh each cycle and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;

/// Frame height floor when the host does not ask for one.
pub const DEFAULT_HEIGHT_PX: u32 = 400;

/// Identity scale factor for the rendered score.
pub const DEFAULT_SCALE: f32 = 1.0;

/// Arguments passed from the Python side of the component.
///
/// Unknown keys in the host object (e.g. Streamlit's `key`/`default`) are
/// ignored; missing keys fall back to the same defaults the Python wrapper
/// documents.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderRequest {
    /// ABC notation source to render. Empty means "nothing to show yet".
    pub notation: String,

    /// Minimum height of the component frame in pixels.
    pub height: u32,

    /// Fixed container width in pixels; full available width when absent.
    pub width: Option<u32>,

    /// Scale factor for the rendered score (1.0 = normal size).
    pub scale: f32,

    /// Whether the score re-flows with the container size.
    pub responsive: bool,

    /// Whether to mount the audio transport and wire playback.
    pub enable_audio: bool,

    /// Active Streamlit theme, merged into the args by the JS loader.
    pub theme: Option<Theme>,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            notation: String::new(),
            height: DEFAULT_HEIGHT_PX,
            width: None,
            scale: DEFAULT_SCALE,
            responsive: true,
            enable_audio: true,
            theme: None,
        }
    }
}

impl RenderRequest {
    /// Validate the numeric knobs the same way the Python wrapper does.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.height == 0 {
            return Err(WidgetError::Config("height must be positive".to_string()));
        }
        if self.width == Some(0) {
            return Err(WidgetError::Config("width must be positive".to_string()));
        }
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(WidgetError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Streamlit theme object, camelCase on the wire.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    pub primary_color: Option<String>,
    pub background_color: Option<String>,
    pub secondary_background_color: Option<String>,
    pub text_color: Option<String>,
}
