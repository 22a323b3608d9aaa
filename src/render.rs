//! Rendering: draws the full scene onto a 2D [`Surface`].
//!
//! This module receives read-only views of document, camera, and overlay
//! state and produces draw calls; it does not mutate application state.
//! The browser implementation of [`Surface`] lives in [`crate::web`]; tests
//! use a recording surface.
//!
//! Layer order is fixed: image, solution, annotations, edit line, answer,
//! buttons and tooltip. The overlay is always topmost and the answer always
//! sits above the edit line.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, ImageSize, Point, Viewport};
use crate::consts::{
    ANSWER_COLOR, ANSWER_MARKER_RADIUS_PX, DEFAULT_LINE_WIDTH, EDIT_LINE_COLOR, ICON_FONT_FAMILY,
    POLYGON_FILL_ALPHA, SOLUTION_COLOR, TOOLTIP_ALPHA, TOOLTIP_CORNER_RADIUS_PX, TOOLTIP_FONT,
};
use crate::doc::{Document, PolygonRef};
use crate::options::Visibility;
use crate::overlay::{Button, Overlay, tooltip_box};
use crate::polygon::Polygon;

/// Minimal 2D drawing API the renderer needs. Coordinates are canvas pixels
/// except for [`Surface::draw_image`].
pub trait Surface {
    type Error;

    fn save(&mut self);
    fn restore(&mut self);
    fn clear(&mut self, viewport: Viewport);
    fn set_alpha(&mut self, alpha: f64);
    /// Use "destination-out" compositing so fills punch holes.
    fn set_knockout(&mut self) -> Result<(), Self::Error>;
    /// Draw the image at its intrinsic size under translate-then-scale.
    fn draw_image(&mut self, translate: Point, scale: f64) -> Result<(), Self::Error>;
    fn stroke_path(&mut self, points: &[Point], closed: bool, color: &str, width: f64);
    fn fill_path(&mut self, points: &[Point], color: &str);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), Self::Error>;
    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) -> Result<(), Self::Error>;
    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: &str);
    fn measure_text(&mut self, text: &str, font: &str) -> Result<f64, Self::Error>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), Self::Error>;
}

/// Everything a render pass reads.
pub struct SceneView<'a> {
    pub doc: &'a Document,
    pub overlay: &'a Overlay,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub image: Option<ImageSize>,
    pub visibility: Visibility,
    pub active: Option<PolygonRef>,
    /// Last known pointer position in canvas space.
    pub pointer: Option<Point>,
}

/// Draw the full scene.
///
/// # Errors
///
/// Returns `Err` if any fallible surface call fails.
pub fn draw<S: Surface>(s: &mut S, scene: &SceneView<'_>) -> Result<(), S::Error> {
    s.clear(scene.viewport);

    if scene.image.is_some() {
        s.draw_image(scene.camera.draw_translation(scene.viewport), scene.camera.scale)?;
    }

    let vis = scene.visibility;
    if vis.solution_visible {
        if let Some(solution) = scene.doc.solution.as_ref() {
            draw_polygon(s, scene, solution, SOLUTION_COLOR, PolygonRef::Solution)?;
        }
    }

    if vis.annotations_visible {
        for (i, annotation) in scene.doc.annotations().iter().enumerate() {
            draw_polygon(s, scene, &annotation.polygon, &annotation.color, PolygonRef::Annotation(i))?;
        }
    }

    if vis.polygon_editing() {
        draw_edit_line(s, scene);
    }

    if vis.answer_visible {
        if let Some(answer) = scene.doc.answer.as_ref() {
            draw_answer(s, scene, answer)?;
        }
    }

    draw_overlay(s, scene)
}

// =============================================================
// Polygons
// =============================================================

fn draw_polygon<S: Surface>(
    s: &mut S,
    scene: &SceneView<'_>,
    polygon: &Polygon,
    color: &str,
    me: PolygonRef,
) -> Result<(), S::Error> {
    if polygon.is_empty() {
        return Ok(());
    }
    let pts: Vec<Point> = polygon
        .points()
        .map(|p| scene.camera.image_to_canvas(p, scene.viewport))
        .collect();

    if polygon.is_closed() {
        s.save();
        s.set_alpha(POLYGON_FILL_ALPHA);
        s.fill_path(&pts, color);
        s.restore();
    }
    if pts.len() > 1 {
        s.stroke_path(&pts, polygon.is_closed(), color, DEFAULT_LINE_WIDTH);
    }

    let editing = scene.visibility.polygon_editing() && scene.active == Some(me);
    if editing || pts.len() == 1 {
        for (pt, vertex) in pts.iter().zip(polygon.vertices()) {
            let half = vertex.handle_width / 2.0;
            s.fill_rect(pt.x - half, pt.y - half, vertex.handle_width, vertex.handle_width, color);
        }
    }
    Ok(())
}

/// Line from the active open polygon's last vertex to the pointer.
fn draw_edit_line<S: Surface>(s: &mut S, scene: &SceneView<'_>) {
    let Some(polygon) = scene.active.and_then(|r| scene.doc.polygon(r)) else {
        return;
    };
    if polygon.is_closed() {
        return;
    }
    let (Some(last), Some(pointer)) = (polygon.last_vertex(), scene.pointer) else {
        return;
    };
    let from = scene.camera.image_to_canvas(last.position, scene.viewport);
    s.stroke_path(&[from, pointer], false, EDIT_LINE_COLOR, DEFAULT_LINE_WIDTH);
}

// =============================================================
// Answer
// =============================================================

fn as_point(value: &serde_json::Value) -> Option<Point> {
    let x = value.get("x")?.as_f64()?;
    let y = value.get("y")?.as_f64()?;
    Some(Point::new(x, y))
}

/// Image-space points an answer value describes: a single `{x, y}` or an
/// array of them. Other shapes describe nothing drawable.
#[must_use]
pub fn answer_points(answer: &serde_json::Value) -> Vec<Point> {
    match answer {
        serde_json::Value::Array(items) => items.iter().filter_map(as_point).collect(),
        other => as_point(other).into_iter().collect(),
    }
}

fn draw_answer<S: Surface>(s: &mut S, scene: &SceneView<'_>, answer: &serde_json::Value) -> Result<(), S::Error> {
    for p in answer_points(answer) {
        let c = scene.camera.image_to_canvas(p, scene.viewport);
        s.fill_circle(c, ANSWER_MARKER_RADIUS_PX, ANSWER_COLOR)?;
        s.stroke_circle(c, ANSWER_MARKER_RADIUS_PX, "#ffffff", 2.0)?;
    }
    Ok(())
}

// =============================================================
// Overlay
// =============================================================

fn draw_overlay<S: Surface>(s: &mut S, scene: &SceneView<'_>) -> Result<(), S::Error> {
    for button in scene.overlay.buttons().iter().chain(scene.overlay.color_buttons()) {
        draw_button(s, button)?;
    }

    if let Some(text) = scene.overlay.tooltip() {
        s.save();
        s.set_alpha(TOOLTIP_ALPHA);
        let width = s.measure_text(text, TOOLTIP_FONT)?;
        let b = tooltip_box(width, scene.viewport);
        s.fill_round_rect(b.x, b.y, b.width, b.height, TOOLTIP_CORNER_RADIUS_PX, "#000000");
        s.fill_text(text, b.text_x, b.text_y, TOOLTIP_FONT, "#ffffff")?;
        s.restore();
    }
    Ok(())
}

fn draw_button<S: Surface>(s: &mut S, button: &Button) -> Result<(), S::Error> {
    let Some(center) = button.draw_position else {
        return Ok(());
    };
    let radius = button.draw_radius;

    s.save();
    s.set_alpha(button.current_alpha());
    s.fill_circle(center, radius, &button.color)?;
    if button.line_width > 0.0 {
        s.stroke_circle(center, radius, button.stroke_style, button.line_width)?;
    }

    if let Some(icon) = button.icon {
        s.save();
        s.set_knockout()?;
        let font = format!("{radius}px {ICON_FONT_FAMILY}");
        let width = s.measure_text(icon, &font)?;
        let x = center.x - width / 2.0;
        let y = center.y + radius * 0.7 / 2.0;
        s.fill_text(icon, x, y, &font, button.icon_color)?;
        s.restore();
    }

    s.restore();
    Ok(())
}
