use crate::error::{GestureError, GestureResult};
use crate::target::GestureTarget;

/// Outcome of a single [`Gesture::step`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureStatus {
    Running,
    Succeeded,
    Failed(GestureError),
}

impl GestureStatus {
    /// Terminal result, or `None` while the gesture is still running.
    pub fn into_result(self) -> Option<GestureResult> {
        match self {
            GestureStatus::Running => None,
            GestureStatus::Succeeded => Some(Ok(())),
            GestureStatus::Failed(error) => Some(Err(error)),
        }
    }
}

/// A time-stepped sequence of synthetic input events.
///
/// The controller calls `step` once per frame with the frame timestamp in
/// nanoseconds until it reports something other than `Running`. A gesture
/// must not call back into the controller that owns it.
pub trait Gesture {
    fn step(&mut self, frame_time_nanos: u64, target: &mut dyn GestureTarget) -> GestureStatus;
}

/// Adapts a closure into a [`Gesture`].
pub struct FnGesture<F> {
    step: F,
}

impl<F> Gesture for FnGesture<F>
where
    F: FnMut(u64, &mut dyn GestureTarget) -> GestureStatus,
{
    fn step(&mut self, frame_time_nanos: u64, target: &mut dyn GestureTarget) -> GestureStatus {
        (self.step)(frame_time_nanos, target)
    }
}

pub fn gesture_fn<F>(step: F) -> FnGesture<F>
where
    F: FnMut(u64, &mut dyn GestureTarget) -> GestureStatus,
{
    FnGesture { step }
}

impl<G: Gesture + ?Sized> Gesture for Box<G> {
    fn step(&mut self, frame_time_nanos: u64, target: &mut dyn GestureTarget) -> GestureStatus {
        (**self).step(frame_time_nanos, target)
    }
}
