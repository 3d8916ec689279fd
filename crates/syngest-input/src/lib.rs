//! Input event vocabulary for Syngest
//!
//! Plain data: geometry primitives plus the pointer, wheel and pinch events
//! a synthetic gesture forwards to its target.

mod event;
mod geometry;
mod pointer;

pub use event::*;
pub use geometry::*;
pub use pointer::*;

pub mod prelude {
    pub use crate::event::{InputEvent, InputSource, PinchInput, WheelInput};
    pub use crate::geometry::{Offset, Point};
    pub use crate::pointer::{PointerButton, PointerButtons, PointerEventKind, PointerInput};
}
