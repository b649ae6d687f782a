//! Visual-render policy for the ABC score widget
//!
//! The actual layout work is delegated to abcjs; this module owns the
//! decisions around it: when a re-render is worth asking for, which options
//! to hand the renderer, and how tall to tell the host the frame is.

pub mod gate;
pub mod height;
pub mod options;

pub use gate::ChangeGate;
pub use height::{frame_height, FRAME_MARGIN_PX};
pub use options::{RenderOptions, FIXED_STAFF_WIDTH};
