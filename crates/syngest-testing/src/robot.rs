//! Robot harness driving a controller against a real frame clock.
//!
//! The robot owns a headless [`Runtime`], a [`GestureDispatchController`]
//! wired to it through a [`FrameClockDelegate`], a [`RecordingTarget`] and a
//! [`SettleSwitch`]. Frames advance only when the test asks.
//!
//! # Example
//!
//! ```
//! use syngest_dispatch::ScriptedGesture;
//! use syngest_input::Point;
//! use syngest_testing::{CompletionLog, DispatchRobot};
//!
//! let mut robot = DispatchRobot::new();
//! let log = CompletionLog::new();
//! robot.enqueue(ScriptedGesture::tap(Point::new(4.0, 4.0), 0), log.callback("tap"));
//! robot.run_until_idle(10).expect("tap completes");
//! assert_eq!(log.result_of("tap"), Some(Ok(())));
//! ```

use std::fmt;
use std::sync::Arc;

use syngest_core::{DefaultScheduler, Runtime, RuntimeHandle};
use syngest_dispatch::{
    FrameClockDelegate, Gesture, GestureCompletion, GestureDispatchController, GestureResult,
};

use crate::recording::{RecordingTarget, SettleSwitch};

/// 60 Hz.
pub const DEFAULT_FRAME_INTERVAL_NANOS: u64 = 16_666_667;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotError {
    /// Work was still pending after the frame budget ran out.
    Stalled { frames: usize, pending_gestures: usize },
}

impl fmt::Display for RobotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RobotError::Stalled {
                frames,
                pending_gestures,
            } => write!(
                f,
                "dispatch still busy after {frames} frames ({pending_gestures} gestures queued)"
            ),
        }
    }
}

impl std::error::Error for RobotError {}

pub struct DispatchRobot {
    runtime: Runtime,
    controller: GestureDispatchController,
    target: RecordingTarget,
    settle: SettleSwitch,
    frame_time_nanos: u64,
    frame_interval_nanos: u64,
}

impl DispatchRobot {
    pub fn new() -> Self {
        Self::with_target(RecordingTarget::new())
    }

    pub fn with_target(target: RecordingTarget) -> Self {
        let runtime = Runtime::new(Arc::new(DefaultScheduler));
        let settle = SettleSwitch::default();
        let oracle = settle.clone();
        let delegate =
            FrameClockDelegate::with_settle_oracle(runtime.frame_clock(), move || oracle.query());
        let controller = GestureDispatchController::new(delegate, target.clone());
        Self {
            runtime,
            controller,
            target,
            settle,
            frame_time_nanos: 0,
            frame_interval_nanos: DEFAULT_FRAME_INTERVAL_NANOS,
        }
    }

    pub fn with_frame_interval(mut self, interval_nanos: u64) -> Self {
        self.frame_interval_nanos = interval_nanos;
        self
    }

    pub fn controller(&self) -> &GestureDispatchController {
        &self.controller
    }

    pub fn target(&self) -> &RecordingTarget {
        &self.target
    }

    pub fn settle(&self) -> &SettleSwitch {
        &self.settle
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Timestamp the next frame will carry.
    pub fn frame_time_nanos(&self) -> u64 {
        self.frame_time_nanos
    }

    pub fn frames_drained(&self) -> u64 {
        self.runtime.frames_drained()
    }

    pub fn enqueue(
        &mut self,
        gesture: impl Gesture + 'static,
        callback: impl FnOnce(GestureResult) + 'static,
    ) {
        self.controller.enqueue(gesture, callback);
    }

    pub fn submit(&mut self, gesture: impl Gesture + 'static) -> GestureCompletion {
        self.controller.submit(gesture)
    }

    /// Drains one frame at the current frame time, then moves the clock on.
    /// Returns how many frame callbacks ran.
    pub fn advance_frame(&mut self) -> usize {
        let handle = self.runtime.handle();
        let ran = handle.drain_frame_callbacks(self.frame_time_nanos);
        handle.drain_ui();
        self.frame_time_nanos += self.frame_interval_nanos;
        ran
    }

    /// Advances frames until nothing is scheduled, giving up after
    /// `max_frames`. Returns the number of frames that ran.
    pub fn run_until_idle(&mut self, max_frames: usize) -> Result<usize, RobotError> {
        let handle = self.runtime.handle();
        handle.drain_ui();
        let mut frames = 0;
        while handle.has_frame_callbacks() || handle.has_pending_ui() {
            if frames == max_frames {
                return Err(RobotError::Stalled {
                    frames,
                    pending_gestures: self.controller.pending_gestures(),
                });
            }
            self.advance_frame();
            frames += 1;
        }
        Ok(frames)
    }
}

impl Default for DispatchRobot {
    fn default() -> Self {
        Self::new()
    }
}
