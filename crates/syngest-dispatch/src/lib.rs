//! Frame-synchronized synthetic gesture dispatch.
//!
//! Gestures are queued on a [`GestureDispatchController`], stepped once per
//! frame against a [`GestureTarget`], and completed only after the
//! [`GestureDelegate`] reports that the target settled. Completion callbacks
//! run exactly once each, in submission order.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use syngest_core::{DefaultScheduler, Runtime};
//! use syngest_dispatch::{FrameClockDelegate, GestureDispatchController, GestureTarget, ScriptedGesture};
//! use syngest_input::{InputEvent, Point};
//!
//! struct Sink;
//! impl GestureTarget for Sink {
//!     fn dispatch_input_event(&mut self, _event: InputEvent) {}
//! }
//!
//! let runtime = Runtime::new(std::sync::Arc::new(DefaultScheduler));
//! let controller =
//!     GestureDispatchController::new(FrameClockDelegate::new(runtime.frame_clock()), Sink);
//! let done = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&done);
//! controller.enqueue(ScriptedGesture::tap(Point::new(10.0, 10.0), 0), move |result| {
//!     assert!(result.is_ok());
//!     flag.set(true);
//! });
//!
//! let handle = runtime.handle();
//! let mut frame = 0;
//! while handle.has_frame_callbacks() {
//!     handle.drain_frame_callbacks(frame * 16_666_667);
//!     frame += 1;
//! }
//! assert!(done.get());
//! ```

mod controller;
mod delegate;
mod error;
mod gesture;
pub mod queue;
mod script;
mod target;

pub use controller::{FrameRequestToken, GestureCompletion, GestureDispatchController};
pub use delegate::{FrameCallback, FrameClockDelegate, GestureDelegate};
pub use error::{GestureError, GestureResult};
pub use gesture::{gesture_fn, FnGesture, Gesture, GestureStatus};
pub use queue::{CompletionCallback, CompletionState, GestureQueue, QueueEntry};
pub use script::{ScriptBuilder, ScriptFrame, ScriptedGesture};
pub use target::GestureTarget;

pub mod prelude {
    pub use crate::controller::GestureDispatchController;
    pub use crate::delegate::{FrameClockDelegate, GestureDelegate};
    pub use crate::error::{GestureError, GestureResult};
    pub use crate::gesture::{gesture_fn, Gesture, GestureStatus};
    pub use crate::script::ScriptedGesture;
    pub use crate::target::GestureTarget;
}
