#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point, Viewport};
use crate::doc::{Document, PolygonRef, VertexRef};
use crate::overlay::{ButtonRef, Overlay};

/// Canvas-space containment test shared by every interactive element.
pub trait Bounds {
    /// Whether the canvas point `pt` falls inside this element.
    fn is_within_bounds(&self, pt: Point, camera: &Camera, viewport: Viewport) -> bool;
}

/// Result of an element's click or mouse-down hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Not handled; fall through to the canvas default (pan or click action).
    Continue,
    /// Handled; nothing else reacts to the event.
    Stop,
}

/// An interactive element found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Button(ButtonRef),
    Vertex(VertexRef),
    Polygon(PolygonRef),
}

/// Read-only view of everything hit-testing needs.
pub struct HitScene<'a> {
    pub overlay: &'a Overlay,
    pub doc: &'a Document,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    /// The polygon whose vertices are editable, when editing is enabled.
    pub editable: Option<PolygonRef>,
}

/// Candidate elements in priority order: zoom buttons, color buttons,
/// editable vertices, annotation polygons, solution.
fn candidates(scene: &HitScene<'_>) -> Vec<HitTarget> {
    let mut out: Vec<HitTarget> = scene.overlay.button_refs().map(HitTarget::Button).collect();

    if let Some(active) = scene.editable {
        if let Some(polygon) = scene.doc.polygon(active) {
            out.extend((0..polygon.len()).map(|index| HitTarget::Vertex(VertexRef { polygon: active, index })));
        }
    }

    out.extend(scene.doc.hit_order().into_iter().map(HitTarget::Polygon));
    out
}

fn contains(scene: &HitScene<'_>, target: HitTarget, pt: Point) -> bool {
    match target {
        HitTarget::Button(b) => scene
            .overlay
            .button(b)
            .is_some_and(|btn| btn.is_within_bounds(pt, scene.camera, scene.viewport)),
        HitTarget::Vertex(v) => scene
            .doc
            .vertex(v)
            .is_some_and(|vx| vx.is_within_bounds(pt, scene.camera, scene.viewport)),
        HitTarget::Polygon(p) => scene
            .doc
            .polygon(p)
            .is_some_and(|poly| poly.is_within_bounds(pt, scene.camera, scene.viewport)),
    }
}

/// Find the topmost interactive element at canvas point `pt`.
///
/// Points off the canvas, and any point on a zero-sized canvas, hit nothing.
#[must_use]
pub fn hit_test(pt: Point, scene: &HitScene<'_>) -> Option<HitTarget> {
    if !scene.viewport.contains(pt) {
        return None;
    }
    candidates(scene).into_iter().find(|&target| contains(scene, target, pt))
}
