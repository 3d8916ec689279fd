//! Headless driver replaying scripted gestures through the Syngest
//! dispatch engine.

pub mod launcher;
pub mod viewport;

pub use launcher::{GestureOutcome, ReplayError, ReplayLauncher, ReplayReport, ReplaySettings};
pub use viewport::{ViewportState, ViewportTarget};
