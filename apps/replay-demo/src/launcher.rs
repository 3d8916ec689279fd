//! Headless replay launcher.
//!
//! `ReplayLauncher` owns a runtime, a [`ViewportTarget`] and a
//! [`GestureDispatchController`], queues the configured gestures and then
//! drains frames at a fixed simulated interval until the queue is empty.
//!
//! # Example
//!
//! ```
//! use replay_demo::ReplayLauncher;
//!
//! let report = ReplayLauncher::new()
//!     .with_settle_frames(1)
//!     .with_demo_gestures()
//!     .run()
//!     .expect("replay finishes");
//! assert!(report.all_succeeded());
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use syngest_core::{Clock, DefaultScheduler, MonotonicClock, Runtime};
use syngest_dispatch::{
    FrameClockDelegate, Gesture, GestureDispatchController, GestureResult, ScriptedGesture,
};
use syngest_input::{Offset, Point};

use crate::viewport::{ViewportState, ViewportTarget};

/// Configuration for a replay run.
#[derive(Clone, Debug)]
pub struct ReplaySettings {
    /// Simulated time between frames.
    pub frame_interval_nanos: u64,
    /// Frames without input before the viewport counts as settled.
    pub settle_frames: u64,
    /// Frame budget for the whole replay.
    pub max_frames: usize,
}

impl Default for ReplaySettings {
    fn default() -> Self {
        Self {
            frame_interval_nanos: 16_666_667,
            settle_frames: 2,
            max_frames: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayError {
    /// The frame budget ran out; the remaining gestures were aborted.
    Stalled { frames: usize, pending_gestures: usize },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::Stalled {
                frames,
                pending_gestures,
            } => write!(
                f,
                "replay stalled after {frames} frames with {pending_gestures} gestures queued"
            ),
        }
    }
}

impl std::error::Error for ReplayError {}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureOutcome {
    pub label: String,
    pub result: GestureResult,
    /// Runtime frame on which the completion callback ran.
    pub completed_frame: u64,
}

#[derive(Clone, Debug)]
pub struct ReplayReport {
    pub frames: usize,
    pub simulated_nanos: u64,
    pub wall_millis: u64,
    pub outcomes: Vec<GestureOutcome>,
    pub viewport: ViewportState,
}

impl ReplayReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &GestureOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.result.is_err())
    }
}

/// Builder for a headless replay.
pub struct ReplayLauncher {
    settings: ReplaySettings,
    gestures: Vec<(String, Box<dyn Gesture>)>,
}

impl ReplayLauncher {
    pub fn new() -> Self {
        Self {
            settings: ReplaySettings::default(),
            gestures: Vec::new(),
        }
    }

    pub fn with_frame_interval(mut self, interval_nanos: u64) -> Self {
        self.settings.frame_interval_nanos = interval_nanos;
        self
    }

    pub fn with_settle_frames(mut self, frames: u64) -> Self {
        self.settings.settle_frames = frames;
        self
    }

    pub fn with_max_frames(mut self, frames: usize) -> Self {
        self.settings.max_frames = frames;
        self
    }

    /// Queues `gesture` behind the ones added so far.
    pub fn with_gesture(
        mut self,
        label: impl Into<String>,
        gesture: impl Gesture + 'static,
    ) -> Self {
        self.gestures.push((label.into(), Box::new(gesture)));
        self
    }

    /// A tap, a two-step scroll and a zoom-in pinch.
    pub fn with_demo_gestures(self) -> Self {
        let interval = self.settings.frame_interval_nanos;
        self.with_gesture(
            "tap",
            ScriptedGesture::tap(Point::new(40.0, 40.0), 2 * interval),
        )
        .with_gesture(
            "scroll",
            ScriptedGesture::wheel_scroll(
                Point::new(160.0, 240.0),
                &[Offset::new(0.0, -48.0), Offset::new(0.0, -24.0)],
                interval,
            ),
        )
        .with_gesture(
            "pinch",
            ScriptedGesture::pinch(Point::new(160.0, 240.0), &[1.1, 1.1, 1.05], interval),
        )
    }

    pub fn settings(&self) -> &ReplaySettings {
        &self.settings
    }

    pub fn run(self) -> Result<ReplayReport, ReplayError> {
        let ReplayLauncher { settings, gestures } = self;
        let clock = MonotonicClock;
        let started = clock.now();

        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let handle = runtime.handle();
        let viewport = ViewportTarget::new(runtime.clone());
        let delegate = FrameClockDelegate::with_settle_oracle(
            runtime.frame_clock(),
            viewport.settle_oracle(settings.settle_frames),
        );
        let controller = GestureDispatchController::new(delegate, viewport.clone());
        let outcomes = Rc::new(RefCell::new(Vec::new()));

        log::info!(
            "replaying {} gestures at {}ns per frame",
            gestures.len(),
            settings.frame_interval_nanos
        );
        for (label, gesture) in gestures {
            let outcomes = Rc::clone(&outcomes);
            let frames = runtime.clone();
            controller.enqueue(gesture, move |result| {
                outcomes.borrow_mut().push(GestureOutcome {
                    label,
                    result,
                    completed_frame: frames.frames_drained(),
                });
            });
        }

        let mut frame_time = 0;
        let mut frames = 0;
        while handle.has_frame_callbacks() {
            if frames == settings.max_frames {
                let pending_gestures = controller.pending_gestures();
                controller.abort_pending();
                return Err(ReplayError::Stalled {
                    frames,
                    pending_gestures,
                });
            }
            handle.drain_frame_callbacks(frame_time);
            handle.drain_ui();
            frame_time += settings.frame_interval_nanos;
            frames += 1;
        }

        let outcomes = outcomes.borrow().clone();
        Ok(ReplayReport {
            frames,
            simulated_nanos: frame_time,
            wall_millis: clock.elapsed_millis(started),
            outcomes,
            viewport: viewport.state(),
        })
    }
}

impl Default for ReplayLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syngest_dispatch::{gesture_fn, GestureError, GestureStatus};
    use syngest_input::{InputEvent, InputSource};

    #[test]
    fn demo_replay_moves_the_viewport() {
        let report = ReplayLauncher::new()
            .with_settle_frames(0)
            .with_demo_gestures()
            .run()
            .expect("replay finishes");

        let labels: Vec<&str> = report
            .outcomes
            .iter()
            .map(|outcome| outcome.label.as_str())
            .collect();
        assert_eq!(labels, ["tap", "scroll", "pinch"]);
        assert!(report.all_succeeded());
        assert_eq!(report.viewport.taps, 1);
        assert_eq!(report.viewport.scroll, Offset::new(0.0, -72.0));
        assert!((report.viewport.zoom - 1.1 * 1.1 * 1.05).abs() < 1e-4);
        // tap 3 frames, scroll 4, pinch 5.
        assert_eq!(report.frames, 12);
        assert_eq!(report.simulated_nanos, 12 * 16_666_667);
    }

    #[test]
    fn settle_frames_delay_each_completion() {
        let quick = ReplayLauncher::new()
            .with_settle_frames(0)
            .with_demo_gestures()
            .run()
            .expect("replay finishes");
        let settled = ReplayLauncher::new()
            .with_settle_frames(3)
            .with_demo_gestures()
            .run()
            .expect("replay finishes");

        assert_eq!(settled.frames, quick.frames + 3 * 3);
        assert!(settled
            .outcomes
            .windows(2)
            .all(|pair| pair[0].completed_frame < pair[1].completed_frame));
    }

    #[test]
    fn unsupported_source_is_reported_per_gesture() {
        let pen_tap = ScriptedGesture::builder()
            .at(0, InputEvent::pointer_down(Point::ZERO))
            .source(InputSource::Pen)
            .build();
        let report = ReplayLauncher::new()
            .with_gesture("pen", pen_tap)
            .with_gesture("tap", ScriptedGesture::tap(Point::ZERO, 0))
            .run()
            .expect("replay finishes");

        assert_eq!(
            report.outcomes[0].result,
            Err(GestureError::SourceNotSupported {
                source: InputSource::Pen
            })
        );
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.viewport.taps, 1);
    }

    #[test]
    fn frame_budget_aborts_the_rest() {
        let error = ReplayLauncher::new()
            .with_max_frames(10)
            .with_gesture("forever", gesture_fn(|_, _| GestureStatus::Running))
            .with_gesture("never", ScriptedGesture::tap(Point::ZERO, 0))
            .run()
            .unwrap_err();

        assert_eq!(
            error,
            ReplayError::Stalled {
                frames: 10,
                pending_gestures: 2
            }
        );
    }
}
