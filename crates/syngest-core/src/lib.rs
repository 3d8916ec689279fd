//! Single-threaded frame callback runtime for Syngest.
//!
//! The runtime owns a queue of one-shot frame callbacks plus a small local
//! executor. A host (window loop, test harness, headless replay) calls
//! [`RuntimeHandle::drain_frame_callbacks`] once per frame; everything else
//! registers work through a [`FrameClock`].

mod frame_clock;
pub mod platform;
mod runtime;

pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use platform::{Clock, DefaultScheduler, MonotonicClock, RuntimeScheduler};
pub use runtime::{Runtime, RuntimeHandle};

pub type FrameCallbackId = u64;
