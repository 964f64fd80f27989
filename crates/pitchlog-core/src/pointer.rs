// Pointer input in widget pixel space, shared by both pitches.

use crate::pitch::PixelPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// One pointer/touch sample. `at` is in the hosting widget's pixel space,
/// the same space the pitch mapper's bounds are expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub at: PixelPoint,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        PointerEvent {
            kind: PointerKind::Down,
            at: PixelPoint::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent {
            kind: PointerKind::Move,
            at: PixelPoint::new(x, y),
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        PointerEvent {
            kind: PointerKind::Up,
            at: PixelPoint::new(x, y),
        }
    }
}
