use crate::geometry::{Offset, Point};
use crate::pointer::{PointerEventKind, PointerInput};

/// Device class an event claims to come from.
///
/// `Default` defers the choice to the target receiving the event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum InputSource {
    #[default]
    Default,
    Touch,
    Mouse,
    Touchpad,
    Pen,
}

impl InputSource {
    /// Replaces `Default` with `fallback`; concrete sources pass through.
    pub fn resolve(self, fallback: InputSource) -> InputSource {
        match self {
            InputSource::Default => fallback,
            source => source,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Begin,
    Update,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelInput {
    pub position: Point,
    pub delta: Offset,
    pub phase: GesturePhase,
    pub source: InputSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchInput {
    pub anchor: Point,
    /// Scale factor relative to the previous pinch event.
    pub scale: f32,
    pub phase: GesturePhase,
    pub source: InputSource,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Pointer(PointerInput),
    Wheel(WheelInput),
    Pinch(PinchInput),
}

impl InputEvent {
    pub fn pointer_down(position: Point) -> Self {
        Self::Pointer(PointerInput::new(PointerEventKind::Down, position))
    }

    pub fn pointer_move(position: Point) -> Self {
        Self::Pointer(PointerInput::new(PointerEventKind::Move, position))
    }

    pub fn pointer_up(position: Point) -> Self {
        Self::Pointer(PointerInput::new(PointerEventKind::Up, position))
    }

    pub fn wheel(position: Point, delta: Offset, phase: GesturePhase) -> Self {
        Self::Wheel(WheelInput {
            position,
            delta,
            phase,
            source: InputSource::Default,
        })
    }

    pub fn pinch(anchor: Point, scale: f32, phase: GesturePhase) -> Self {
        Self::Pinch(PinchInput {
            anchor,
            scale,
            phase,
            source: InputSource::Default,
        })
    }

    pub fn source(&self) -> InputSource {
        match self {
            InputEvent::Pointer(pointer) => pointer.source,
            InputEvent::Wheel(wheel) => wheel.source,
            InputEvent::Pinch(pinch) => pinch.source,
        }
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        match &mut self {
            InputEvent::Pointer(pointer) => pointer.source = source,
            InputEvent::Wheel(wheel) => wheel.source = source,
            InputEvent::Pinch(pinch) => pinch.source = source,
        }
        self
    }

    /// Position the event is aimed at.
    pub fn position(&self) -> Point {
        match self {
            InputEvent::Pointer(pointer) => pointer.position,
            InputEvent::Wheel(wheel) => wheel.position,
            InputEvent::Pinch(pinch) => pinch.anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_source_resolves_to_fallback() {
        assert_eq!(
            InputSource::Default.resolve(InputSource::Mouse),
            InputSource::Mouse
        );
        assert_eq!(
            InputSource::Pen.resolve(InputSource::Mouse),
            InputSource::Pen
        );
    }

    #[test]
    fn with_source_rewrites_every_variant() {
        let events = [
            InputEvent::pointer_down(Point::ZERO),
            InputEvent::wheel(Point::ZERO, Offset::new(0.0, -10.0), GesturePhase::Update),
            InputEvent::pinch(Point::ZERO, 1.1, GesturePhase::Begin),
        ];
        for event in events {
            assert_eq!(event.source(), InputSource::Default);
            assert_eq!(
                event.with_source(InputSource::Touchpad).source(),
                InputSource::Touchpad
            );
        }
    }
}
