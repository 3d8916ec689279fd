use crate::event::InputSource;
use crate::geometry::Point;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    Cancel,
}

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
    Back = 3,
    Forward = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// A single pointer sample forwarded to a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub id: PointerId,
    pub kind: PointerEventKind,
    pub position: Point,
    pub buttons: PointerButtons,
    pub source: InputSource,
}

impl PointerInput {
    pub fn new(kind: PointerEventKind, position: Point) -> Self {
        let buttons = match kind {
            PointerEventKind::Down | PointerEventKind::Move => PointerButtons::PRIMARY,
            PointerEventKind::Up | PointerEventKind::Cancel => PointerButtons::NONE,
        };
        Self {
            id: 0,
            kind,
            position,
            buttons,
            source: InputSource::Default,
        }
    }

    pub fn with_source(mut self, source: InputSource) -> Self {
        self.source = source;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_insert_and_remove() {
        let mut buttons = PointerButtons::new().with(PointerButton::Secondary);
        assert!(buttons.contains(PointerButton::Secondary));
        assert!(!buttons.contains(PointerButton::Primary));

        buttons.insert(PointerButton::Primary);
        buttons.remove(PointerButton::Secondary);
        assert_eq!(buttons, PointerButtons::PRIMARY);
    }

    #[test]
    fn release_clears_pressed_buttons() {
        let up = PointerInput::new(PointerEventKind::Up, Point::ZERO);
        assert!(up.buttons.is_empty());
        let down = PointerInput::new(PointerEventKind::Down, Point::ZERO);
        assert!(down.buttons.contains(PointerButton::Primary));
    }
}
