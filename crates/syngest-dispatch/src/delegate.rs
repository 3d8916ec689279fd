use std::cell::RefCell;

use syngest_core::{FrameCallbackRegistration, FrameClock};

/// One-shot callback receiving the frame timestamp in nanoseconds.
pub type FrameCallback = Box<dyn FnOnce(u64) + 'static>;

/// Host services the controller needs: a frame tick and a settle oracle.
pub trait GestureDelegate {
    /// Arranges for `callback` to run once, asynchronously, before the
    /// next frame. Must not run it synchronously from inside this call.
    fn request_frame_callback(&self, callback: FrameCallback);

    /// Whether the target has stopped reacting to the events it received.
    fn has_target_settled(&self) -> bool;
}

/// [`GestureDelegate`] backed by a runtime [`FrameClock`].
///
/// Holds the registration of the most recent request, so dropping the
/// delegate (and with it the controller) cancels a callback that has not
/// fired yet.
pub struct FrameClockDelegate {
    clock: FrameClock,
    registration: RefCell<Option<FrameCallbackRegistration>>,
    settled: Box<dyn Fn() -> bool>,
}

impl FrameClockDelegate {
    /// A delegate whose target is always considered settled.
    pub fn new(clock: FrameClock) -> Self {
        Self::with_settle_oracle(clock, || true)
    }

    pub fn with_settle_oracle(clock: FrameClock, settled: impl Fn() -> bool + 'static) -> Self {
        Self {
            clock,
            registration: RefCell::new(None),
            settled: Box::new(settled),
        }
    }
}

impl GestureDelegate for FrameClockDelegate {
    fn request_frame_callback(&self, callback: FrameCallback) {
        let registration = self.clock.with_frame_nanos(callback);
        if !registration.is_active() {
            log::warn!("frame clock runtime is gone; synthetic gesture dispatch stalls");
        }
        // At most one request is live; the previous one fired or was abandoned.
        let previous = self.registration.borrow_mut().replace(registration);
        drop(previous);
    }

    fn has_target_settled(&self) -> bool {
        (self.settled)()
    }
}
