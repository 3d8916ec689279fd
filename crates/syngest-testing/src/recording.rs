//! Test doubles for the controller's collaborators.
//!
//! Every double is a cheap `Clone` over shared state, so a test keeps one
//! copy for inspection and hands the other to the controller.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use syngest_dispatch::{
    gesture_fn, FrameCallback, Gesture, GestureDelegate, GestureResult, GestureStatus,
    GestureTarget,
};
use syngest_input::{InputEvent, InputSource, Point};

/// Target that keeps every event it receives.
#[derive(Clone)]
pub struct RecordingTarget {
    events: Rc<RefCell<Vec<InputEvent>>>,
    unsupported: Rc<RefCell<HashSet<InputSource>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
            unsupported: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub fn reject_source(&self, source: InputSource) {
        self.unsupported.borrow_mut().insert(source);
    }

    pub fn events(&self) -> Vec<InputEvent> {
        self.events.borrow().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.borrow().len()
    }
}

impl Default for RecordingTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTarget for RecordingTarget {
    fn dispatch_input_event(&mut self, event: InputEvent) {
        log::trace!("recording target received {:?}", event);
        self.events.borrow_mut().push(event);
    }

    fn supports_source(&self, source: InputSource) -> bool {
        !self.unsupported.borrow().contains(&source)
    }
}

/// Answers for `has_target_settled`, shared between a test and a delegate.
///
/// Queries first consume scripted answers, then fall back to the default.
#[derive(Clone)]
pub struct SettleSwitch {
    default: Rc<Cell<bool>>,
    scripted: Rc<RefCell<VecDeque<bool>>>,
    queries: Rc<Cell<usize>>,
}

impl SettleSwitch {
    pub fn new(settled: bool) -> Self {
        Self {
            default: Rc::new(Cell::new(settled)),
            scripted: Rc::new(RefCell::new(VecDeque::new())),
            queries: Rc::new(Cell::new(0)),
        }
    }

    pub fn set(&self, settled: bool) {
        self.default.set(settled);
    }

    /// The next `frames` queries report "still moving".
    pub fn unsettled_for(&self, frames: usize) {
        self.scripted
            .borrow_mut()
            .extend(std::iter::repeat(false).take(frames));
    }

    pub fn queries(&self) -> usize {
        self.queries.get()
    }

    pub fn query(&self) -> bool {
        self.queries.set(self.queries.get() + 1);
        let scripted = self.scripted.borrow_mut().pop_front();
        scripted.unwrap_or_else(|| self.default.get())
    }
}

impl Default for SettleSwitch {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Delegate that parks frame callbacks until the test fires them.
#[derive(Clone, Default)]
pub struct RecordingDelegate {
    callbacks: Rc<RefCell<Vec<FrameCallback>>>,
    requests: Rc<Cell<usize>>,
    settle: SettleSwitch,
}

impl RecordingDelegate {
    pub fn new(settle: SettleSwitch) -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(Vec::new())),
            requests: Rc::new(Cell::new(0)),
            settle,
        }
    }

    pub fn settle(&self) -> &SettleSwitch {
        &self.settle
    }

    /// Total frame callbacks requested so far.
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    /// Frame callbacks requested but not fired yet.
    pub fn pending(&self) -> usize {
        self.callbacks.borrow().len()
    }

    /// Fires the parked callbacks as one frame; returns how many ran.
    pub fn fire_frame(&self, frame_time_nanos: u64) -> usize {
        let callbacks: Vec<FrameCallback> = self.callbacks.borrow_mut().drain(..).collect();
        let count = callbacks.len();
        for callback in callbacks {
            callback(frame_time_nanos);
        }
        count
    }
}

impl GestureDelegate for RecordingDelegate {
    fn request_frame_callback(&self, callback: FrameCallback) {
        self.requests.set(self.requests.get() + 1);
        self.callbacks.borrow_mut().push(callback);
    }

    fn has_target_settled(&self) -> bool {
        self.settle.query()
    }
}

/// Ordered record of completion callbacks.
#[derive(Clone, Default)]
pub struct CompletionLog {
    entries: Rc<RefCell<Vec<(String, GestureResult)>>>,
}

impl CompletionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion callback recording `label` with the result.
    pub fn callback(&self, label: impl Into<String>) -> impl FnOnce(GestureResult) + 'static {
        let entries = Rc::clone(&self.entries);
        let label = label.into();
        move |result| entries.borrow_mut().push((label, result))
    }

    pub fn entries(&self) -> Vec<(String, GestureResult)> {
        self.entries.borrow().clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn result_of(&self, label: &str) -> Option<GestureResult> {
        self.entries
            .borrow()
            .iter()
            .find(|(entry, _)| entry == label)
            .map(|(_, result)| result.clone())
    }
}

/// Step counter shared with a [`probe_gesture`].
#[derive(Clone, Default)]
pub struct StepCounter(Rc<Cell<usize>>);

impl StepCounter {
    pub fn get(&self) -> usize {
        self.0.get()
    }
}

/// Gesture replaying `statuses` one per step (then `Running` forever),
/// forwarding a pointer move at `(tag, 0)` on every step.
pub fn probe_gesture(
    tag: f32,
    statuses: impl IntoIterator<Item = GestureStatus>,
    steps: &StepCounter,
) -> impl Gesture + 'static {
    let mut statuses: VecDeque<GestureStatus> = statuses.into_iter().collect();
    let steps = steps.clone();
    gesture_fn(move |_, target| {
        steps.0.set(steps.0.get() + 1);
        target.dispatch_input_event(InputEvent::pointer_move(Point::new(tag, 0.0)));
        statuses.pop_front().unwrap_or(GestureStatus::Running)
    })
}
