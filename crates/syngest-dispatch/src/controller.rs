//! Frame-synchronized driver for the gesture queue.
//!
//! The queue itself is the state machine:
//!
//! - empty queue: idle, no frame callback requested;
//! - front entry unresolved: each frame steps the gesture once and asks for
//!   another frame while it keeps running;
//! - front entry resolved: each frame asks the delegate whether the target
//!   settled; once it has, the completion callback runs, the entry is popped
//!   and the next entry (if any) starts on the following frame.
//!
//! Exactly one frame request is outstanding whenever the queue is non-empty.
//! Each request carries a token; a callback whose token is no longer the
//! pending one does nothing.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll, Waker};

use crate::delegate::GestureDelegate;
use crate::error::{GestureError, GestureResult};
use crate::gesture::Gesture;
use crate::queue::{CompletionCallback, GestureQueue, QueueEntry};
use crate::target::GestureTarget;

/// Identifies one frame-callback request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameRequestToken(u64);

struct ControllerInner {
    delegate: Box<dyn GestureDelegate>,
    target: RefCell<Box<dyn GestureTarget>>,
    queue: RefCell<GestureQueue>,
    pending_frame: Cell<Option<FrameRequestToken>>,
    next_token: Cell<u64>,
    gestures_started: Cell<u64>,
    self_ref: Weak<ControllerInner>,
}

impl ControllerInner {
    fn request_frame(&self) {
        debug_assert!(
            self.pending_frame.get().is_none(),
            "second frame request while one is pending"
        );
        let token = FrameRequestToken(self.next_token.get());
        self.next_token.set(token.0 + 1);
        self.pending_frame.set(Some(token));

        let weak = self.self_ref.clone();
        self.delegate
            .request_frame_callback(Box::new(move |frame_time_nanos| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_requested_frame(token, frame_time_nanos);
                }
            }));
    }

    fn on_requested_frame(&self, token: FrameRequestToken, frame_time_nanos: u64) {
        if self.pending_frame.get() != Some(token) {
            log::trace!("ignoring stale frame callback {:?}", token);
            return;
        }
        self.run_frame(frame_time_nanos);
    }

    fn run_frame(&self, frame_time_nanos: u64) -> bool {
        self.pending_frame.set(None);
        self.dispatch_next_event(frame_time_nanos)
    }

    /// One dispatch step. Returns whether a frame request is pending after it.
    fn dispatch_next_event(&self, frame_time_nanos: u64) -> bool {
        let status = {
            let mut queue = self.queue.borrow_mut();
            let Some(entry) = queue.front_mut() else {
                return false;
            };
            if entry.is_resolved() {
                None
            } else {
                let mut target = self.target.borrow_mut();
                Some(entry.gesture_mut().step(frame_time_nanos, &mut **target))
            }
        };

        if let Some(status) = status {
            match status.into_result() {
                None => {
                    self.request_frame();
                    return true;
                }
                Some(result) => {
                    log::debug!(
                        "synthetic gesture {} finished ({:?}), waiting for target to settle",
                        self.gestures_started.get(),
                        result
                    );
                    self.queue.borrow_mut().mark_front_resolved(result);
                }
            }
        }

        let settled = self.delegate.has_target_settled();

        // The oracle may have aborted the queue, taking the entry with it.
        if !self.queue.borrow().is_front_resolved() {
            return self.pending_frame.get().is_some();
        }

        if !settled {
            self.request_frame();
            return true;
        }

        self.finish_front_gesture();

        // A completion callback may have restarted the queue already.
        let has_next = !self.queue.borrow().is_empty();
        if has_next && self.pending_frame.get().is_none() {
            self.start_front_gesture();
        }
        self.pending_frame.get().is_some()
    }

    fn start_front_gesture(&self) {
        self.queue.borrow_mut().mark_front_running();
        let started = self.gestures_started.get() + 1;
        self.gestures_started.set(started);
        log::debug!("synthetic gesture {} started", started);
        self.request_frame();
    }

    fn finish_front_gesture(&self) {
        let (callback, result) = self.queue.borrow_mut().take_front_completion();
        log::debug!(
            "synthetic gesture {} completed: {:?}",
            self.gestures_started.get(),
            result
        );
        callback(result);

        // The callback may have aborted the queue, taking the entry with it.
        let mut queue = self.queue.borrow_mut();
        if queue.is_front_resolved() {
            queue.pop();
        }
    }

    fn enqueue(&self, gesture: Box<dyn Gesture>, callback: CompletionCallback) {
        let was_empty = {
            let mut queue = self.queue.borrow_mut();
            let was_empty = queue.is_empty();
            queue.push(gesture, callback);
            was_empty
        };
        if was_empty {
            self.start_front_gesture();
        }
    }

    fn abort_pending(&self) -> usize {
        self.pending_frame.set(None);
        let callbacks: Vec<CompletionCallback> = self
            .queue
            .borrow_mut()
            .drain()
            .filter_map(QueueEntry::into_callback)
            .collect();
        if !callbacks.is_empty() {
            log::debug!("aborting {} queued synthetic gestures", callbacks.len());
        }
        let aborted = callbacks.len();
        for callback in callbacks {
            callback(Err(GestureError::Aborted));
        }
        aborted
    }
}

impl Drop for ControllerInner {
    fn drop(&mut self) {
        let pending = self.queue.get_mut().len();
        if pending > 0 {
            log::warn!(
                "gesture controller dropped with {} queued gestures; their callbacks will not run",
                pending
            );
        }
    }
}

/// Runs queued synthetic gestures one at a time, one step per frame.
///
/// All calls must happen on the thread that drives the delegate's frame
/// callbacks. Completion callbacks run on that thread too, in submission
/// order, and may enqueue more gestures.
///
/// Dropping the controller discards queued gestures without running their
/// callbacks. Call [`abort_pending`](Self::abort_pending) first when every
/// callback has to fire.
pub struct GestureDispatchController {
    inner: Rc<ControllerInner>,
}

impl GestureDispatchController {
    pub fn new(
        delegate: impl GestureDelegate + 'static,
        target: impl GestureTarget + 'static,
    ) -> Self {
        let inner = Rc::new_cyclic(|self_ref| ControllerInner {
            delegate: Box::new(delegate),
            target: RefCell::new(Box::new(target)),
            queue: RefCell::new(GestureQueue::new()),
            pending_frame: Cell::new(None),
            next_token: Cell::new(1),
            gestures_started: Cell::new(0),
            self_ref: self_ref.clone(),
        });
        Self { inner }
    }

    /// Queues `gesture`; `callback` runs exactly once with its result.
    ///
    /// Requests a frame right away when the queue was empty. Otherwise the
    /// gesture waits until everything ahead of it has completed.
    pub fn enqueue(
        &self,
        gesture: impl Gesture + 'static,
        callback: impl FnOnce(GestureResult) + 'static,
    ) {
        self.inner.enqueue(Box::new(gesture), Box::new(callback));
    }

    /// Queues `gesture` and returns a future for its result.
    ///
    /// The future stays pending forever if the controller is dropped first.
    pub fn submit(&self, gesture: impl Gesture + 'static) -> GestureCompletion {
        let completion = GestureCompletion::new();
        let slot = Rc::clone(&completion.slot);
        self.enqueue(gesture, move |result| {
            let waker = {
                let mut slot = slot.borrow_mut();
                slot.result = Some(result);
                slot.waker.take()
            };
            if let Some(waker) = waker {
                waker.wake();
            }
        });
        completion
    }

    /// Performs one dispatch step for the pending frame request.
    ///
    /// This is what the callback handed to the delegate runs; hosts that tick
    /// the controller directly may call it instead. Returns `true` while work
    /// remains. A call with no request pending does nothing.
    pub fn on_frame_callback(&self, frame_time_nanos: u64) -> bool {
        if self.inner.pending_frame.get().is_none() {
            if !self.inner.queue.borrow().is_empty() {
                log::warn!("frame callback with no pending frame request ignored");
            }
            return false;
        }
        self.inner.run_frame(frame_time_nanos)
    }

    /// Fails every queued gesture with [`GestureError::Aborted`], front first,
    /// and returns to idle. Returns how many callbacks ran.
    pub fn abort_pending(&self) -> usize {
        self.inner.abort_pending()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.queue.borrow().is_empty()
    }

    pub fn pending_gestures(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.pending_frame.get().is_some()
    }

    /// Whether the front gesture has finished and only waits for the target
    /// to settle.
    pub fn is_awaiting_settle(&self) -> bool {
        self.inner.queue.borrow().is_front_resolved()
    }
}

impl fmt::Debug for GestureDispatchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureDispatchController")
            .field("pending_gestures", &self.pending_gestures())
            .field("pending_frame", &self.inner.pending_frame.get())
            .finish()
    }
}

#[derive(Default)]
struct CompletionSlot {
    result: Option<GestureResult>,
    waker: Option<Waker>,
}

/// Future returned by [`GestureDispatchController::submit`].
pub struct GestureCompletion {
    slot: Rc<RefCell<CompletionSlot>>,
}

impl GestureCompletion {
    fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(CompletionSlot::default())),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slot.borrow().result.is_some()
    }
}

impl Future for GestureCompletion {
    type Output = GestureResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
