use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use syngest_core::{DefaultScheduler, Runtime};
use syngest_dispatch::{
    gesture_fn, FrameClockDelegate, GestureDispatchController, GestureError, GestureStatus,
    ScriptedGesture,
};
use syngest_input::{GesturePhase, InputEvent, InputSource, Offset, Point};
use syngest_testing::robot_assertions::{
    assert_all_succeeded, assert_approx_eq, assert_completed_in_order, assert_count,
};
use syngest_testing::{
    CompletionLog, DispatchRobot, RecordingTarget, RobotError, DEFAULT_FRAME_INTERVAL_NANOS,
};

const FRAME: u64 = DEFAULT_FRAME_INTERVAL_NANOS;

#[test]
fn tap_scroll_and_pinch_replay_in_order() {
    let mut robot = DispatchRobot::new();
    let log = CompletionLog::new();

    robot.enqueue(
        ScriptedGesture::tap(Point::new(20.0, 20.0), FRAME),
        log.callback("tap"),
    );
    robot.enqueue(
        ScriptedGesture::wheel_scroll(
            Point::new(100.0, 200.0),
            &[Offset::new(0.0, -30.0), Offset::new(0.0, -20.0)],
            FRAME,
        ),
        log.callback("scroll"),
    );
    robot.enqueue(
        ScriptedGesture::pinch(Point::new(50.0, 50.0), &[1.1, 1.2], FRAME),
        log.callback("pinch"),
    );

    let frames = robot.run_until_idle(100).expect("replay finishes");

    assert_completed_in_order(&log, &["tap", "scroll", "pinch"], "replay order");
    assert_all_succeeded(&log, "replay results");
    let events = robot.target().events();
    assert_count(&events, 2 + 4 + 4, "forwarded events");
    // Each gesture starts on the frame its predecessor completes.
    assert_eq!(frames, 2 + 4 + 4);

    let total_scroll: f32 = events
        .iter()
        .filter_map(|event| match event {
            InputEvent::Wheel(wheel) => Some(wheel.delta.dy),
            _ => None,
        })
        .sum();
    assert_approx_eq(total_scroll, -50.0, 0.001, "scroll distance");
    assert!(events.iter().all(|event| match event {
        InputEvent::Pointer(pointer) => pointer.source == InputSource::Touch,
        other => other.source() == InputSource::Touchpad,
    }));
}

#[test]
fn completion_waits_for_settle_frames() {
    let mut robot = DispatchRobot::new();
    let log = CompletionLog::new();
    robot.settle().unsettled_for(5);

    robot.enqueue(
        ScriptedGesture::tap(Point::new(1.0, 1.0), 0),
        log.callback("tap"),
    );
    robot.advance_frame();
    assert!(log.is_empty());
    assert!(robot.controller().is_awaiting_settle());

    let frames = robot.run_until_idle(20).expect("settles");

    assert_eq!(frames, 5);
    assert_eq!(log.result_of("tap"), Some(Ok(())));
    assert_eq!(robot.settle().queries(), 6);
}

#[test]
fn unsupported_source_fails_gesture_and_queue_moves_on() {
    let target = RecordingTarget::new();
    target.reject_source(InputSource::Touchpad);
    let mut robot = DispatchRobot::with_target(target);
    let log = CompletionLog::new();

    robot.enqueue(
        ScriptedGesture::pinch(Point::ZERO, &[1.5], FRAME),
        log.callback("pinch"),
    );
    robot.enqueue(ScriptedGesture::tap(Point::ZERO, 0), log.callback("tap"));
    robot.run_until_idle(10).expect("queue drains");

    assert_eq!(
        log.entries(),
        vec![
            (
                "pinch".to_string(),
                Err(GestureError::SourceNotSupported {
                    source: InputSource::Touchpad
                })
            ),
            ("tap".to_string(), Ok(())),
        ]
    );
    assert_eq!(robot.target().event_count(), 2);
}

#[test]
fn rejection_partway_through_keeps_earlier_events() {
    let target = RecordingTarget::new();
    target.reject_source(InputSource::Pen);
    let mut robot = DispatchRobot::with_target(target);
    let log = CompletionLog::new();

    let script = ScriptedGesture::builder()
        .at(0, InputEvent::pointer_down(Point::new(8.0, 8.0)))
        .after(
            FRAME,
            InputEvent::pointer_up(Point::new(8.0, 8.0)).with_source(InputSource::Pen),
        )
        .build();
    robot.enqueue(script, log.callback("mixed"));
    let frames = robot.run_until_idle(10).expect("queue drains");

    assert_eq!(frames, 2);
    assert_eq!(
        log.result_of("mixed"),
        Some(Err(GestureError::SourceNotSupported {
            source: InputSource::Pen
        }))
    );
    let events = robot.target().events();
    assert_count(&events, 1, "events before the rejection");
    assert_eq!(events[0].source(), InputSource::Touch);
}

#[test]
fn gesture_sees_frame_timestamps() {
    let mut robot = DispatchRobot::new().with_frame_interval(10);
    let seen = Rc::new(RefCell::new(Vec::new()));

    {
        let seen = Rc::clone(&seen);
        robot.enqueue(
            gesture_fn(move |time, target| {
                seen.borrow_mut().push(time);
                target.dispatch_input_event(InputEvent::wheel(
                    Point::ZERO,
                    Offset::new(0.0, 1.0),
                    GesturePhase::Update,
                ));
                if seen.borrow().len() == 3 {
                    GestureStatus::Succeeded
                } else {
                    GestureStatus::Running
                }
            }),
            |_| {},
        );
    }
    robot.run_until_idle(10).expect("finishes");

    assert_eq!(seen.borrow().as_slice(), &[0, 10, 20]);
}

#[test]
fn stalled_queue_reports_robot_error() {
    let mut robot = DispatchRobot::new();
    robot.enqueue(gesture_fn(|_, _| GestureStatus::Running), |_| {});

    let error = robot.run_until_idle(30).unwrap_err();

    assert_eq!(
        error,
        RobotError::Stalled {
            frames: 30,
            pending_gestures: 1
        }
    );
}

#[test]
fn submitted_gesture_can_be_awaited_on_the_runtime() {
    let mut robot = DispatchRobot::new();
    let outcome = Rc::new(RefCell::new(None));

    let completion = robot.submit(ScriptedGesture::tap(Point::new(3.0, 3.0), FRAME));
    let handle = robot.runtime_handle();
    {
        let outcome = Rc::clone(&outcome);
        assert!(handle.spawn_ui(async move {
            let result = completion.await;
            *outcome.borrow_mut() = Some(result);
        }));
    }

    robot.run_until_idle(10).expect("finishes");

    assert_eq!(*outcome.borrow(), Some(Ok(())));
}

#[test]
fn dropping_controller_cancels_its_frame_request() {
    let runtime = Runtime::new(Arc::new(DefaultScheduler));
    let handle = runtime.handle();
    let controller = GestureDispatchController::new(
        FrameClockDelegate::new(runtime.frame_clock()),
        RecordingTarget::new(),
    );
    let fired = Rc::new(Cell::new(false));

    {
        let fired = Rc::clone(&fired);
        controller.enqueue(gesture_fn(|_, _| GestureStatus::Running), move |_| {
            fired.set(true)
        });
    }
    assert!(handle.has_frame_callbacks());

    drop(controller);

    assert!(!handle.has_frame_callbacks());
    assert_eq!(handle.drain_frame_callbacks(0), 0);
    assert!(!fired.get());
}

#[test]
fn abort_pending_drains_through_real_runtime() {
    let mut robot = DispatchRobot::new();
    let log = CompletionLog::new();

    robot.enqueue(gesture_fn(|_, _| GestureStatus::Running), log.callback("a"));
    robot.enqueue(ScriptedGesture::tap(Point::ZERO, 0), log.callback("b"));
    robot.advance_frame();
    robot.advance_frame();

    assert_eq!(robot.controller().abort_pending(), 2);
    assert_completed_in_order(&log, &["a", "b"], "abort order");
    assert!(log
        .entries()
        .iter()
        .all(|(_, result)| *result == Err(GestureError::Aborted)));

    // The abandoned request still fires once, as a no-op.
    assert_eq!(robot.run_until_idle(5), Ok(1));
    assert!(robot.controller().is_idle());
}
