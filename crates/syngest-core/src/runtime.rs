use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::thread::ThreadId;

use smallvec::SmallVec;

use crate::frame_clock::FrameClock;
use crate::platform::RuntimeScheduler;
use crate::FrameCallbackId;

type FrameCallbackFn = Box<dyn FnOnce(u64) + 'static>;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    frames_drained: Cell<u64>,
    ui_thread_id: ThreadId,
    tasks: RefCell<Vec<LocalTask>>,
    task_waker: RefCell<Option<Waker>>,
}

type LocalTask = Pin<Box<dyn Future<Output = ()> + 'static>>;

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            frames_drained: Cell::new(0),
            ui_thread_id: std::thread::current().id(),
            tasks: RefCell::new(Vec::new()),
            task_waker: RefCell::new(None),
        }
    }

    fn init_task_waker(this: &Rc<Self>) {
        let waker = RuntimeTaskWaker::new(this.scheduler.clone()).into_waker();
        *this.task_waker.borrow_mut() = Some(waker);
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }

    /// The future may hold `Rc`/`RefCell` values because it is only ever
    /// polled on the runtime thread.
    fn spawn_ui_task(&self, future: LocalTask) {
        self.tasks.borrow_mut().push(future);
        self.schedule();
    }

    fn poll_async_tasks(&self) -> bool {
        let waker = match self.task_waker.borrow().as_ref() {
            Some(waker) => waker.clone(),
            None => return false,
        };
        let mut cx = Context::from_waker(&waker);
        let tasks = std::mem::take(&mut *self.tasks.borrow_mut());
        let mut pending = Vec::with_capacity(tasks.len());
        let mut made_progress = false;
        for mut task in tasks {
            match task.as_mut().poll(&mut cx) {
                Poll::Ready(()) => made_progress = true,
                Poll::Pending => pending.push(task),
            }
        }
        // Tasks spawned while polling landed in the emptied list; they count
        // as progress so the next pass polls them.
        let mut tasks = self.tasks.borrow_mut();
        let spawned = std::mem::take(&mut *tasks);
        made_progress |= !spawned.is_empty();
        tasks.extend(pending);
        tasks.extend(spawned);
        made_progress
    }

    /// Polls spawned tasks until a full pass makes no progress.
    fn drain_ui(&self) {
        while self.poll_async_tasks() {}
        self.refresh_needs_frame();
    }

    fn has_pending_ui(&self) -> bool {
        self.tasks
            .try_borrow()
            .map(|tasks| !tasks.is_empty())
            .unwrap_or(true)
    }

    fn register_frame_callback(&self, callback: FrameCallbackFn) -> FrameCallbackId {
        debug_assert_eq!(
            std::thread::current().id(),
            self.ui_thread_id,
            "frame callback registered off the runtime thread",
        );
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.schedule();
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        drop(callbacks);
        self.refresh_needs_frame();
    }

    fn refresh_needs_frame(&self) {
        if !self.has_frame_callbacks() && !self.has_pending_ui() {
            self.needs_frame.set(false);
        }
    }

    /// Runs every callback registered before this call. Callbacks registered
    /// while draining wait for the next frame.
    fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        let mut pending: SmallVec<[FrameCallbackFn; 4]> = SmallVec::with_capacity(callbacks.len());
        while let Some(mut entry) = callbacks.pop_front() {
            if let Some(callback) = entry.callback.take() {
                pending.push(callback);
            }
        }
        drop(callbacks);
        self.frames_drained.set(self.frames_drained.get() + 1);
        let count = pending.len();
        log::trace!(
            "draining {} frame callbacks at {}ns",
            count,
            frame_time_nanos
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
        self.refresh_needs_frame();
        count
    }
}

#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        let inner = Rc::new(RuntimeInner::new(scheduler));
        RuntimeInner::init_task_waker(&inner);
        Self { inner }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    /// Number of frames drained so far.
    pub fn frames_drained(&self) -> u64 {
        self.inner.frames_drained.get()
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.handle())
    }
}

/// Weak handle to a [`Runtime`]. Every operation is a no-op once the
/// runtime has been dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    /// Runs `fut` on the runtime thread, polled from [`drain_ui`].
    /// Returns `false` and drops the future when the runtime is gone.
    ///
    /// [`drain_ui`]: Self::drain_ui
    pub fn spawn_ui<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + 'static,
    {
        match self.inner.upgrade() {
            Some(inner) => {
                inner.spawn_ui_task(Box::pin(fut));
                true
            }
            None => false,
        }
    }

    pub fn drain_ui(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_ui();
        }
    }

    pub fn has_pending_ui(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_pending_ui())
            .unwrap_or(false)
    }

    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Runs the callbacks registered for this frame and returns how many ran.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) -> usize {
        self.inner
            .upgrade()
            .map(|inner| inner.drain_frame_callbacks(frame_time_nanos))
            .unwrap_or(0)
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<FrameCallbackFn>,
}

struct RuntimeTaskWaker {
    scheduler: Arc<dyn RuntimeScheduler>,
}

impl RuntimeTaskWaker {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self { scheduler }
    }

    fn into_waker(self) -> Waker {
        futures_task::waker(Arc::new(self))
    }
}

impl futures_task::ArcWake for RuntimeTaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.scheduler.schedule_frame();
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
