//! Audio transport wiring for the ABC score widget
//!
//! The transport controller itself is an abcjs object owned by the platform
//! layer; this module owns the logic around it. The controller is created at
//! most once per widget lifetime, and each freshly rendered score has to be
//! handed to it through two asynchronous steps (synth buffer init, then tune
//! binding) that may start before the controller even exists. The
//! [`ConnectionSequencer`] tracks that handoff.

pub mod connection;

pub use connection::{ConnectAction, ConnectionSequencer, ConnectionState};
