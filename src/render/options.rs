//! Render option derivation
//!
//! Maps the host configuration onto the option object handed to
//! `ABCJS.renderAbc`. Field names follow the abcjs API, so serialization
//! attributes carry the exact wire spelling.

use serde::Serialize;

use crate::models::config::RenderRequest;

/// Staff width used when responsive layout is off.
pub const FIXED_STAFF_WIDTH: u32 = 600;

/// Options for one `renderAbc` call.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RenderOptions {
    pub scale: f32,

    /// Fixed staff width; only set when responsive layout is disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staffwidth: Option<u32>,

    /// abcjs responsive mode; only ever the string "resize".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsive: Option<&'static str>,

    /// Per-note CSS classes, required for the playback cursor highlight.
    pub add_classes: bool,
}

impl RenderOptions {
    pub fn from_request(request: &RenderRequest) -> Self {
        Self {
            scale: request.scale,
            staffwidth: (!request.responsive).then_some(FIXED_STAFF_WIDTH),
            responsive: request.responsive.then_some("resize"),
            add_classes: request.enable_audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responsive_layout_omits_staffwidth() {
        let request = RenderRequest {
            responsive: true,
            ..Default::default()
        };
        let options = RenderOptions::from_request(&request);
        assert_eq!(options.staffwidth, None);
        assert_eq!(options.responsive, Some("resize"));
    }

    #[test]
    fn fixed_layout_pins_staffwidth() {
        let request = RenderRequest {
            responsive: false,
            ..Default::default()
        };
        let options = RenderOptions::from_request(&request);
        assert_eq!(options.staffwidth, Some(FIXED_STAFF_WIDTH));
        assert_eq!(options.responsive, None);
    }

    #[test]
    fn note_classes_track_audio_flag() {
        let with_audio = RenderRequest {
            enable_audio: true,
            ..Default::default()
        };
        let without_audio = RenderRequest {
            enable_audio: false,
            ..Default::default()
        };
        assert!(RenderOptions::from_request(&with_audio).add_classes);
        assert!(!RenderOptions::from_request(&without_audio).add_classes);
    }

    #[test]
    fn serializes_with_abcjs_spelling() {
        let request = RenderRequest {
            scale: 1.5,
            responsive: false,
            enable_audio: true,
            ..Default::default()
        };
        let json = serde_json::to_value(RenderOptions::from_request(&request)).unwrap();
        assert_eq!(json["scale"], 1.5);
        assert_eq!(json["staffwidth"], 600);
        assert_eq!(json["add_classes"], true);
        assert!(json.get("responsive").is_none());
    }
}
