//! FIFO of pending gestures and their completion callbacks.
//!
//! Only the front entry is ever stepped or resolved; everything behind it
//! waits in `Unset`. Contract violations panic: they are bugs in the
//! caller, not runtime conditions.

use std::collections::VecDeque;
use std::fmt;

use crate::error::GestureResult;
use crate::gesture::Gesture;

pub type CompletionCallback = Box<dyn FnOnce(GestureResult) + 'static>;

/// Progress of a queue entry. Moves forward only: `Unset` → `Running` →
/// `Resolved`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionState {
    Unset,
    Running,
    Resolved(GestureResult),
}

pub struct QueueEntry {
    gesture: Box<dyn Gesture>,
    callback: Option<CompletionCallback>,
    state: CompletionState,
}

impl QueueEntry {
    fn new(gesture: Box<dyn Gesture>, callback: CompletionCallback) -> Self {
        Self {
            gesture,
            callback: Some(callback),
            state: CompletionState::Unset,
        }
    }

    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, CompletionState::Resolved(_))
    }

    pub fn gesture_mut(&mut self) -> &mut dyn Gesture {
        self.gesture.as_mut()
    }

    /// Consumes the entry, handing back its callback if it has not fired.
    pub fn into_callback(self) -> Option<CompletionCallback> {
        self.callback
    }
}

impl fmt::Debug for QueueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("state", &self.state)
            .field("callback_pending", &self.callback.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct GestureQueue {
    entries: VecDeque<QueueEntry>,
}

impl GestureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, gesture: Box<dyn Gesture>, callback: CompletionCallback) {
        self.entries.push_back(QueueEntry::new(gesture, callback));
    }

    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut QueueEntry> {
        self.entries.front_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_front_resolved(&self) -> bool {
        self.entries.front().is_some_and(QueueEntry::is_resolved)
    }

    /// Moves the front entry from `Unset` to `Running`. Already running is
    /// left alone.
    pub fn mark_front_running(&mut self) {
        let entry = self
            .entries
            .front_mut()
            .unwrap_or_else(|| panic!("mark_front_running on an empty gesture queue"));
        match entry.state {
            CompletionState::Unset => entry.state = CompletionState::Running,
            CompletionState::Running => {}
            CompletionState::Resolved(_) => {
                panic!("mark_front_running on a resolved gesture")
            }
        }
    }

    pub fn mark_front_resolved(&mut self, result: GestureResult) {
        let entry = self
            .entries
            .front_mut()
            .unwrap_or_else(|| panic!("mark_front_resolved on an empty gesture queue"));
        assert!(
            !entry.is_resolved(),
            "gesture resolved twice (was {:?}, now {:?})",
            entry.state,
            result
        );
        entry.state = CompletionState::Resolved(result);
    }

    /// Moves the callback and recorded result out of the resolved front
    /// entry so the caller can run the callback with no borrow held.
    pub fn take_front_completion(&mut self) -> (CompletionCallback, GestureResult) {
        let entry = self
            .entries
            .front_mut()
            .unwrap_or_else(|| panic!("take_front_completion on an empty gesture queue"));
        let result = match &entry.state {
            CompletionState::Resolved(result) => result.clone(),
            state => panic!("completion taken from an unresolved gesture ({state:?})"),
        };
        let callback = entry
            .callback
            .take()
            .unwrap_or_else(|| panic!("completion callback taken twice"));
        (callback, result)
    }

    /// Removes the resolved front entry. Never runs its callback.
    pub fn pop(&mut self) {
        let entry = self
            .entries
            .pop_front()
            .unwrap_or_else(|| panic!("pop on an empty gesture queue"));
        assert!(
            entry.is_resolved(),
            "popped an unresolved gesture ({:?})",
            entry.state
        );
        debug_assert!(
            entry.callback.is_none(),
            "popped a gesture whose completion callback never ran"
        );
    }

    /// Empties the queue front to back.
    pub fn drain(&mut self) -> impl Iterator<Item = QueueEntry> + '_ {
        self.entries.drain(..)
    }
}
