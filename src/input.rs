//! Input model: mouse buttons, wheel deltas, and the pointer state tracked
//! between events.
//!
//! `PointerState` is the input dispatcher's memory. It records whether the
//! primary button is held (even outside the canvas), what the next drag
//! delta moves, which element is under the pointer, and where the pointer
//! was last seen so that move events can be turned into deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::VertexRef;
use crate::hit::HitTarget;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` code. Unknown codes are treated as secondary.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            _ => Self::Secondary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

impl WheelDelta {
    /// Scrolling up zooms out; everything else zooms in.
    #[must_use]
    pub fn zooms_out(&self) -> bool {
        self.dy < 0.0
    }
}

/// What absorbs the next drag delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveTarget {
    /// Dragging pans the image (moves the camera center).
    #[default]
    Center,
    /// Dragging moves one vertex.
    Vertex(VertexRef),
}

/// Pointer bookkeeping between input events.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Primary button is held. Tracked globally so drags survive leaving the canvas.
    pub left_button_down: bool,
    pub move_target: MoveTarget,
    /// Element currently under the pointer.
    pub focus: Option<HitTarget>,
    /// Canvas position of the previous move event; `None` before the first one.
    pub last_pos: Option<Point>,
    /// The pointer moved while the primary button was held since the last
    /// press. The click that ends such a drag is ignored.
    pub dragged: bool,
}

impl PointerState {
    /// Record `pos` as the latest pointer position and return the delta from
    /// the previous one. The first call measures from the canvas origin.
    pub fn advance(&mut self, pos: Point) -> Point {
        let last = self.last_pos.unwrap_or_default();
        self.last_pos = Some(pos);
        Point::new(pos.x - last.x, pos.y - last.y)
    }

    /// Start a press: forget whether the previous press turned into a drag.
    pub fn press(&mut self) {
        self.dragged = false;
    }

    /// End a drag: the next drag pans again.
    pub fn release(&mut self) {
        self.move_target = MoveTarget::Center;
        self.left_button_down = false;
    }
}
