//! Replay of pre-recorded input events.
//!
//! A [`ScriptedGesture`] forwards events at fixed offsets from its first
//! step. It never invents samples: whatever the script holds is replayed as
//! is, on the first frame at or after each event's offset.

use syngest_input::{GesturePhase, InputEvent, InputSource, Offset, Point};

use crate::error::GestureError;
use crate::gesture::{Gesture, GestureStatus};
use crate::target::GestureTarget;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScriptFrame {
    /// Nanoseconds after the gesture's first step.
    pub offset_nanos: u64,
    pub event: InputEvent,
}

#[derive(Clone, Debug)]
pub struct ScriptedGesture {
    frames: Vec<ScriptFrame>,
    next: usize,
    start_time: Option<u64>,
}

impl ScriptedGesture {
    /// Frames are replayed in offset order; equal offsets keep their order.
    pub fn new(frames: impl IntoIterator<Item = ScriptFrame>) -> Self {
        let mut frames: Vec<ScriptFrame> = frames.into_iter().collect();
        frames.sort_by_key(|frame| frame.offset_nanos);
        Self {
            frames,
            next: 0,
            start_time: None,
        }
    }

    pub fn builder() -> ScriptBuilder {
        ScriptBuilder::default()
    }

    /// Press and release at `position`, `hold_nanos` apart.
    pub fn tap(position: Point, hold_nanos: u64) -> Self {
        Self::builder()
            .at(0, InputEvent::pointer_down(position))
            .at(hold_nanos, InputEvent::pointer_up(position))
            .build()
    }

    /// Wheel events carrying `deltas`, one every `interval_nanos`, bracketed
    /// by begin/end phases.
    pub fn wheel_scroll(position: Point, deltas: &[Offset], interval_nanos: u64) -> Self {
        let mut builder =
            Self::builder().at(0, InputEvent::wheel(position, Offset::ZERO, GesturePhase::Begin));
        for delta in deltas {
            builder = builder.after(
                interval_nanos,
                InputEvent::wheel(position, *delta, GesturePhase::Update),
            );
        }
        builder
            .after(
                interval_nanos,
                InputEvent::wheel(position, Offset::ZERO, GesturePhase::End),
            )
            .source(InputSource::Touchpad)
            .build()
    }

    /// Pinch updates carrying incremental `scales` around `anchor`.
    pub fn pinch(anchor: Point, scales: &[f32], interval_nanos: u64) -> Self {
        let mut builder = Self::builder().at(0, InputEvent::pinch(anchor, 1.0, GesturePhase::Begin));
        for scale in scales {
            builder = builder.after(
                interval_nanos,
                InputEvent::pinch(anchor, *scale, GesturePhase::Update),
            );
        }
        builder
            .after(
                interval_nanos,
                InputEvent::pinch(anchor, 1.0, GesturePhase::End),
            )
            .source(InputSource::Touchpad)
            .build()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Events not yet forwarded.
    pub fn remaining(&self) -> usize {
        self.frames.len() - self.next
    }

    /// Offset of the last event, i.e. the shortest replay time.
    pub fn duration_nanos(&self) -> u64 {
        self.frames.last().map_or(0, |frame| frame.offset_nanos)
    }
}

impl Gesture for ScriptedGesture {
    fn step(&mut self, frame_time_nanos: u64, target: &mut dyn GestureTarget) -> GestureStatus {
        let start = *self.start_time.get_or_insert(frame_time_nanos);
        let elapsed = frame_time_nanos.saturating_sub(start);
        let fallback = target.default_input_source();

        while let Some(frame) = self.frames.get(self.next) {
            if frame.offset_nanos > elapsed {
                break;
            }
            let source = frame.event.source().resolve(fallback);
            if !target.supports_source(source) {
                return GestureStatus::Failed(GestureError::SourceNotSupported { source });
            }
            target.dispatch_input_event(frame.event.with_source(source));
            self.next += 1;
        }

        if self.next == self.frames.len() {
            GestureStatus::Succeeded
        } else {
            GestureStatus::Running
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ScriptBuilder {
    frames: Vec<ScriptFrame>,
    cursor: u64,
    source: Option<InputSource>,
}

impl ScriptBuilder {
    /// Adds `event` at an absolute offset.
    pub fn at(mut self, offset_nanos: u64, event: InputEvent) -> Self {
        self.cursor = self.cursor.max(offset_nanos);
        self.frames.push(ScriptFrame {
            offset_nanos,
            event,
        });
        self
    }

    /// Adds `event` `delay_nanos` after the latest offset so far.
    pub fn after(self, delay_nanos: u64, event: InputEvent) -> Self {
        let offset = self.cursor.saturating_add(delay_nanos);
        self.at(offset, event)
    }

    /// Stamps `source` on events that left theirs as `Default`.
    pub fn source(mut self, source: InputSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> ScriptedGesture {
        let source = self.source;
        ScriptedGesture::new(self.frames.into_iter().map(|frame| match source {
            Some(source) if frame.event.source() == InputSource::Default => ScriptFrame {
                event: frame.event.with_source(source),
                ..frame
            },
            _ => frame,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syngest_input::PointerEventKind;

    #[derive(Default)]
    struct VecTarget {
        events: Vec<InputEvent>,
        reject: Option<InputSource>,
    }

    impl GestureTarget for VecTarget {
        fn dispatch_input_event(&mut self, event: InputEvent) {
            self.events.push(event);
        }

        fn default_input_source(&self) -> InputSource {
            InputSource::Mouse
        }

        fn supports_source(&self, source: InputSource) -> bool {
            self.reject != Some(source)
        }
    }

    const FRAME: u64 = 16_000_000;

    #[test]
    fn events_are_released_once_their_offset_elapses() {
        let mut tap = ScriptedGesture::tap(Point::new(5.0, 5.0), 2 * FRAME);
        let mut target = VecTarget::default();

        assert_eq!(tap.step(100, &mut target), GestureStatus::Running);
        assert_eq!(target.events.len(), 1);
        assert_eq!(tap.step(100 + FRAME, &mut target), GestureStatus::Running);
        assert_eq!(target.events.len(), 1);
        assert_eq!(tap.step(100 + 2 * FRAME, &mut target), GestureStatus::Succeeded);

        let kinds: Vec<_> = target
            .events
            .iter()
            .map(|event| match event {
                InputEvent::Pointer(pointer) => pointer.kind,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(kinds, [PointerEventKind::Down, PointerEventKind::Up]);
    }

    #[test]
    fn late_frame_flushes_every_due_event() {
        let mut scroll = ScriptedGesture::wheel_scroll(
            Point::ZERO,
            &[Offset::new(0.0, -10.0), Offset::new(0.0, -20.0)],
            FRAME,
        );
        let mut target = VecTarget::default();

        assert_eq!(scroll.step(0, &mut target), GestureStatus::Running);
        assert_eq!(scroll.remaining(), 3);
        assert_eq!(scroll.step(10 * FRAME, &mut target), GestureStatus::Succeeded);
        assert_eq!(target.events.len(), 4);
        assert_eq!(scroll.duration_nanos(), 3 * FRAME);
    }

    #[test]
    fn default_source_resolves_through_target() {
        let mut tap = ScriptedGesture::tap(Point::ZERO, 0);
        let mut target = VecTarget::default();

        assert_eq!(tap.step(0, &mut target), GestureStatus::Succeeded);
        assert!(target
            .events
            .iter()
            .all(|event| event.source() == InputSource::Mouse));
    }

    #[test]
    fn unsupported_source_fails_without_forwarding() {
        let mut pinch = ScriptedGesture::pinch(Point::ZERO, &[1.2], FRAME);
        let mut target = VecTarget {
            reject: Some(InputSource::Touchpad),
            ..VecTarget::default()
        };

        assert_eq!(
            pinch.step(0, &mut target),
            GestureStatus::Failed(GestureError::SourceNotSupported {
                source: InputSource::Touchpad
            })
        );
        assert!(target.events.is_empty());
    }

    #[test]
    fn rejection_mid_script_keeps_forwarded_events() {
        let mut script = ScriptedGesture::builder()
            .at(0, InputEvent::pointer_down(Point::ZERO))
            .after(
                FRAME,
                InputEvent::pinch(Point::ZERO, 1.5, GesturePhase::Begin)
                    .with_source(InputSource::Touchpad),
            )
            .build();
        let mut target = VecTarget {
            reject: Some(InputSource::Touchpad),
            ..VecTarget::default()
        };

        assert_eq!(script.step(0, &mut target), GestureStatus::Running);
        assert_eq!(
            script.step(FRAME, &mut target),
            GestureStatus::Failed(GestureError::SourceNotSupported {
                source: InputSource::Touchpad
            })
        );
        assert_eq!(target.events.len(), 1);
        assert_eq!(target.events[0].source(), InputSource::Mouse);
        assert_eq!(script.remaining(), 1);
    }

    #[test]
    fn empty_script_succeeds_on_first_step() {
        let mut empty = ScriptedGesture::new(Vec::new());
        let mut target = VecTarget::default();

        assert!(empty.is_empty());
        assert_eq!(empty.step(42, &mut target), GestureStatus::Succeeded);
    }

    #[test]
    fn builder_orders_frames_by_offset() {
        let script = ScriptedGesture::builder()
            .at(3 * FRAME, InputEvent::pointer_up(Point::ZERO))
            .at(0, InputEvent::pointer_down(Point::ZERO))
            .build();

        assert_eq!(script.len(), 2);
        assert_eq!(script.frames[0].offset_nanos, 0);
        assert_eq!(script.duration_nanos(), 3 * FRAME);
    }
}
