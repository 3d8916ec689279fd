//! Stand-in for a scrollable, zoomable surface receiving synthetic input.

use std::cell::RefCell;
use std::rc::Rc;

use syngest_core::Runtime;
use syngest_dispatch::GestureTarget;
use syngest_input::{InputEvent, InputSource, Offset, PointerEventKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub scroll: Offset,
    pub zoom: f32,
    pub pressed: bool,
    pub taps: usize,
    pub events: usize,
    /// Runtime frame that delivered the latest event.
    pub last_event_frame: u64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scroll: Offset::ZERO,
            zoom: 1.0,
            pressed: false,
            taps: 0,
            events: 0,
            last_event_frame: 0,
        }
    }
}

/// Applies wheel and pinch deltas, counts taps and remembers when input
/// last arrived.
#[derive(Clone)]
pub struct ViewportTarget {
    state: Rc<RefCell<ViewportState>>,
    runtime: Runtime,
}

impl ViewportTarget {
    pub fn new(runtime: Runtime) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewportState::default())),
            runtime,
        }
    }

    pub fn state(&self) -> ViewportState {
        *self.state.borrow()
    }

    /// Settled once `quiet_frames` frames passed without input.
    pub fn settle_oracle(&self, quiet_frames: u64) -> impl Fn() -> bool + 'static {
        let state = Rc::clone(&self.state);
        let runtime = self.runtime.clone();
        move || {
            let last = state.borrow().last_event_frame;
            runtime.frames_drained().saturating_sub(last) >= quiet_frames
        }
    }
}

impl GestureTarget for ViewportTarget {
    fn dispatch_input_event(&mut self, event: InputEvent) {
        let mut state = self.state.borrow_mut();
        state.events += 1;
        state.last_event_frame = self.runtime.frames_drained();
        match event {
            InputEvent::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Down => state.pressed = true,
                PointerEventKind::Up if state.pressed => {
                    state.pressed = false;
                    state.taps += 1;
                }
                PointerEventKind::Up | PointerEventKind::Cancel => state.pressed = false,
                _ => {}
            },
            InputEvent::Wheel(wheel) => state.scroll += wheel.delta,
            InputEvent::Pinch(pinch) => state.zoom *= pinch.scale,
        }
        log::trace!("viewport now {:?}", *state);
    }

    fn supports_source(&self, source: InputSource) -> bool {
        source != InputSource::Pen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use syngest_core::DefaultScheduler;
    use syngest_input::{GesturePhase, Point};

    #[test]
    fn applies_scroll_zoom_and_taps() {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let mut viewport = ViewportTarget::new(runtime);

        viewport.dispatch_input_event(InputEvent::pointer_down(Point::ZERO));
        viewport.dispatch_input_event(InputEvent::pointer_up(Point::ZERO));
        viewport.dispatch_input_event(InputEvent::wheel(
            Point::ZERO,
            Offset::new(0.0, -12.0),
            GesturePhase::Update,
        ));
        viewport.dispatch_input_event(InputEvent::pinch(Point::ZERO, 2.0, GesturePhase::Update));

        let state = viewport.state();
        assert_eq!(state.taps, 1);
        assert_eq!(state.scroll, Offset::new(0.0, -12.0));
        assert_eq!(state.zoom, 2.0);
        assert_eq!(state.events, 4);
    }

    #[test]
    fn oracle_waits_for_quiet_frames() {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let handle = runtime.handle();
        let mut viewport = ViewportTarget::new(runtime);
        let settled = viewport.settle_oracle(2);

        handle.drain_frame_callbacks(0);
        viewport.dispatch_input_event(InputEvent::pointer_down(Point::ZERO));
        assert!(!settled());

        handle.drain_frame_callbacks(1);
        assert!(!settled());
        handle.drain_frame_callbacks(2);
        assert!(settled());
    }
}
