#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::PolygonRef;

// =============================================================
// MouseButton
// =============================================================

#[test]
fn mouse_button_from_dom_codes() {
    assert_eq!(MouseButton::from_dom(0), MouseButton::Primary);
    assert_eq!(MouseButton::from_dom(1), MouseButton::Middle);
    assert_eq!(MouseButton::from_dom(2), MouseButton::Secondary);
    assert_eq!(MouseButton::from_dom(4), MouseButton::Secondary);
}

// =============================================================
// WheelDelta
// =============================================================

#[test]
fn wheel_up_zooms_out() {
    assert!(WheelDelta { dx: 0.0, dy: -120.0 }.zooms_out());
}

#[test]
fn wheel_down_zooms_in() {
    assert!(!WheelDelta { dx: 0.0, dy: 3.0 }.zooms_out());
}

#[test]
fn horizontal_only_wheel_zooms_in() {
    assert!(!WheelDelta { dx: 10.0, dy: 0.0 }.zooms_out());
}

// =============================================================
// PointerState
// =============================================================

#[test]
fn default_pointer_state_pans() {
    let s = PointerState::default();
    assert!(!s.left_button_down);
    assert_eq!(s.move_target, MoveTarget::Center);
    assert!(s.focus.is_none());
    assert!(s.last_pos.is_none());
    assert!(!s.dragged);
}

#[test]
fn first_advance_measures_from_origin() {
    let mut s = PointerState::default();
    let d = s.advance(Point::new(30.0, 40.0));
    assert_eq!(d, Point::new(30.0, 40.0));
    assert_eq!(s.last_pos, Some(Point::new(30.0, 40.0)));
}

#[test]
fn advance_returns_delta_from_previous() {
    let mut s = PointerState::default();
    s.advance(Point::new(30.0, 40.0));
    let d = s.advance(Point::new(25.0, 50.0));
    assert_eq!(d, Point::new(-5.0, 10.0));
}

#[test]
fn release_resets_target_and_button() {
    let mut s = PointerState {
        left_button_down: true,
        move_target: MoveTarget::Vertex(VertexRef { polygon: PolygonRef::Solution, index: 2 }),
        ..Default::default()
    };
    s.release();
    assert!(!s.left_button_down);
    assert_eq!(s.move_target, MoveTarget::Center);
}

#[test]
fn press_clears_drag_marker() {
    let mut s = PointerState { dragged: true, ..Default::default() };
    s.press();
    assert!(!s.dragged);
}

#[test]
fn release_keeps_drag_marker_for_following_click() {
    let mut s = PointerState { left_button_down: true, dragged: true, ..Default::default() };
    s.release();
    assert!(s.dragged);
}
