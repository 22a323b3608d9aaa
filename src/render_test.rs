#![allow(clippy::float_cmp)]

use std::convert::Infallible;

use serde_json::json;

use super::*;
use crate::consts::{ANNOTATION_COLORS, BUTTON_ENABLED_ALPHA};
use crate::doc::AnnotationRecord;
use crate::options::Mode;

// =============================================================
// Recording surface
// =============================================================

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Save,
    Restore,
    Clear,
    Alpha(f64),
    Knockout,
    Image { translate: Point, scale: f64 },
    Stroke { points: Vec<Point>, closed: bool, color: String },
    Fill { points: Vec<Point>, color: String },
    Rect { color: String },
    Circle { center: Point, color: String },
    StrokeCircle { color: String },
    RoundRect,
    Measure,
    Text { text: String },
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl Recorder {
    fn position(&self, pred: impl Fn(&Op) -> bool) -> Option<usize> {
        self.ops.iter().position(pred)
    }

    fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    fn strokes_in(&self, color: &str) -> Vec<&Op> {
        self.ops.iter().filter(|op| matches!(op, Op::Stroke { color: c, .. } if c == color)).collect()
    }
}

impl Surface for Recorder {
    type Error = Infallible;

    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn clear(&mut self, _viewport: Viewport) {
        self.ops.push(Op::Clear);
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(Op::Alpha(alpha));
    }
    fn set_knockout(&mut self) -> Result<(), Infallible> {
        self.ops.push(Op::Knockout);
        Ok(())
    }
    fn draw_image(&mut self, translate: Point, scale: f64) -> Result<(), Infallible> {
        self.ops.push(Op::Image { translate, scale });
        Ok(())
    }
    fn stroke_path(&mut self, points: &[Point], closed: bool, color: &str, _width: f64) {
        self.ops.push(Op::Stroke { points: points.to_vec(), closed, color: color.to_string() });
    }
    fn fill_path(&mut self, points: &[Point], color: &str) {
        self.ops.push(Op::Fill { points: points.to_vec(), color: color.to_string() });
    }
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, color: &str) {
        self.ops.push(Op::Rect { color: color.to_string() });
    }
    fn fill_circle(&mut self, center: Point, _radius: f64, color: &str) -> Result<(), Infallible> {
        self.ops.push(Op::Circle { center, color: color.to_string() });
        Ok(())
    }
    fn stroke_circle(&mut self, _center: Point, _radius: f64, color: &str, _width: f64) -> Result<(), Infallible> {
        self.ops.push(Op::StrokeCircle { color: color.to_string() });
        Ok(())
    }
    fn fill_round_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _radius: f64, _color: &str) {
        self.ops.push(Op::RoundRect);
    }
    fn measure_text(&mut self, _text: &str, _font: &str) -> Result<f64, Infallible> {
        self.ops.push(Op::Measure);
        Ok(40.0)
    }
    fn fill_text(&mut self, text: &str, _x: f64, _y: f64, _font: &str, _color: &str) -> Result<(), Infallible> {
        self.ops.push(Op::Text { text: text.to_string() });
        Ok(())
    }
}

// =============================================================
// Scene fixture
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

struct Scene {
    doc: Document,
    overlay: Overlay,
    camera: Camera,
    viewport: Viewport,
    image: Option<ImageSize>,
    mode: Mode,
    active: Option<PolygonRef>,
    pointer: Option<Point>,
}

impl Scene {
    fn new(mode: Mode) -> Self {
        let viewport = Viewport::new(800.0, 600.0);
        let mut overlay = Overlay::new(mode.visibility().annotations_editable);
        overlay.layout(viewport);
        Self {
            doc: Document::new(),
            overlay,
            camera: Camera { scale: 1.0, center: pt(400.0, 300.0) },
            viewport,
            image: Some(ImageSize { width: 800.0, height: 600.0 }),
            mode,
            active: None,
            pointer: None,
        }
    }

    fn draw(&self) -> Recorder {
        let view = SceneView {
            doc: &self.doc,
            overlay: &self.overlay,
            camera: &self.camera,
            viewport: self.viewport,
            image: self.image,
            visibility: self.mode.visibility(),
            active: self.active,
            pointer: self.pointer,
        };
        let mut rec = Recorder::default();
        match draw(&mut rec, &view) {
            Ok(()) => rec,
            Err(never) => match never {},
        }
    }
}

fn triangle() -> Vec<Point> {
    vec![pt(100.0, 100.0), pt(200.0, 100.0), pt(150.0, 200.0)]
}

fn closed_triangle() -> Vec<Point> {
    vec![pt(100.0, 100.0), pt(200.0, 100.0), pt(150.0, 200.0), pt(100.0, 100.0)]
}

// =============================================================
// Layers
// =============================================================

#[test]
fn frame_starts_with_clear_then_image() {
    let rec = Scene::new(Mode::None).draw();
    assert_eq!(rec.ops[0], Op::Clear);
    assert_eq!(rec.ops[1], Op::Image { translate: pt(0.0, 0.0), scale: 1.0 });
}

#[test]
fn image_skipped_until_loaded() {
    let mut scene = Scene::new(Mode::None);
    scene.image = None;
    let rec = scene.draw();
    assert_eq!(rec.count(|op| matches!(op, Op::Image { .. })), 0);
}

#[test]
fn image_only_mode_draws_no_polygons() {
    let mut scene = Scene::new(Mode::None);
    scene.doc.import_solution(&closed_triangle());
    scene.doc.answer = Some(json!({ "x": 5, "y": 5 }));
    let rec = scene.draw();
    assert!(rec.strokes_in(SOLUTION_COLOR).is_empty());
    assert_eq!(rec.count(|op| matches!(op, Op::Circle { color, .. } if color == ANSWER_COLOR)), 0);
}

#[test]
fn answer_drawn_above_solution_and_below_buttons() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&closed_triangle());
    scene.doc.answer = Some(json!({ "x": 50, "y": 60 }));
    let rec = scene.draw();

    let solution = rec.position(|op| matches!(op, Op::Stroke { color, .. } if color == SOLUTION_COLOR)).unwrap();
    let answer = rec.position(|op| matches!(op, Op::Circle { color, .. } if color == ANSWER_COLOR)).unwrap();
    let button = rec.position(|op| matches!(op, Op::Circle { color, .. } if color == "#000000")).unwrap();
    assert!(solution < answer);
    assert!(answer < button);
    assert!(rec.ops.contains(&Op::Circle { center: pt(50.0, 60.0), color: ANSWER_COLOR.to_string() }));
}

#[test]
fn solution_below_annotations() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&triangle());
    scene.doc.import_annotations(&[AnnotationRecord { polygon: triangle(), color: "#fb8072".into() }]);
    let mut visibility = scene.mode.visibility();
    visibility.annotations_visible = true;
    let view = SceneView {
        doc: &scene.doc,
        overlay: &scene.overlay,
        camera: &scene.camera,
        viewport: scene.viewport,
        image: scene.image,
        visibility,
        active: None,
        pointer: None,
    };
    let mut rec = Recorder::default();
    assert!(draw(&mut rec, &view).is_ok());
    let solution = rec.position(|op| matches!(op, Op::Stroke { color, .. } if color == SOLUTION_COLOR)).unwrap();
    let annotation = rec.position(|op| matches!(op, Op::Stroke { color, .. } if color == "#fb8072")).unwrap();
    assert!(solution < annotation);
}

#[test]
fn overlay_is_topmost() {
    let mut scene = Scene::new(Mode::EditSolution);
    scene.doc.import_solution(&triangle());
    scene.active = Some(PolygonRef::Solution);
    scene.pointer = Some(pt(300.0, 300.0));
    scene.overlay.set_tooltip(Some("Zoom in".into()));
    let rec = scene.draw();

    let edit_line = rec.position(|op| matches!(op, Op::Stroke { color, .. } if color == EDIT_LINE_COLOR)).unwrap();
    let first_button = rec.position(|op| matches!(op, Op::Circle { color, .. } if color == "#000000")).unwrap();
    let tooltip = rec.position(|op| *op == Op::RoundRect).unwrap();
    assert!(edit_line < first_button);
    assert!(first_button < tooltip);
    assert_eq!(rec.ops.last(), Some(&Op::Restore));
}

// =============================================================
// Polygons
// =============================================================

#[test]
fn closed_polygon_filled_translucent_then_stroked() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&closed_triangle());
    let rec = scene.draw();

    let fill = rec.position(|op| matches!(op, Op::Fill { .. })).unwrap();
    assert_eq!(rec.ops[fill - 1], Op::Alpha(POLYGON_FILL_ALPHA));
    let strokes = rec.strokes_in(SOLUTION_COLOR);
    assert_eq!(strokes.len(), 1);
    assert!(matches!(strokes[0], Op::Stroke { closed: true, points, .. } if points.len() == 3));
}

#[test]
fn open_polygon_is_not_filled() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&triangle());
    let rec = scene.draw();
    assert_eq!(rec.count(|op| matches!(op, Op::Fill { .. })), 0);
    assert!(matches!(rec.strokes_in(SOLUTION_COLOR)[0], Op::Stroke { closed: false, .. }));
}

#[test]
fn handles_only_on_active_polygon_while_editing() {
    let mut scene = Scene::new(Mode::EditSolution);
    scene.doc.import_solution(&triangle());
    assert_eq!(scene.draw().count(|op| matches!(op, Op::Rect { .. })), 0);

    scene.active = Some(PolygonRef::Solution);
    assert_eq!(scene.draw().count(|op| matches!(op, Op::Rect { .. })), 3);
}

#[test]
fn single_vertex_polygon_always_shows_handle() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&[pt(10.0, 10.0)]);
    let rec = scene.draw();
    assert_eq!(rec.count(|op| matches!(op, Op::Rect { .. })), 1);
    assert!(rec.strokes_in(SOLUTION_COLOR).is_empty());
}

#[test]
fn polygons_drawn_in_canvas_space() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.camera = Camera { scale: 2.0, center: pt(400.0, 300.0) };
    scene.doc.import_solution(&[pt(300.0, 200.0), pt(400.0, 200.0)]);
    let rec = scene.draw();
    let Op::Stroke { points, .. } = rec.strokes_in(SOLUTION_COLOR)[0] else {
        panic!("expected a stroke");
    };
    assert_eq!(points, &vec![pt(200.0, 100.0), pt(400.0, 100.0)]);
}

// =============================================================
// Edit line
// =============================================================

#[test]
fn edit_line_runs_from_last_vertex_to_pointer() {
    let mut scene = Scene::new(Mode::EditSolution);
    scene.doc.import_solution(&triangle());
    scene.active = Some(PolygonRef::Solution);
    scene.pointer = Some(pt(300.0, 300.0));
    let rec = scene.draw();
    let lines = rec.strokes_in(EDIT_LINE_COLOR);
    assert_eq!(lines.len(), 1);
    assert!(matches!(lines[0], Op::Stroke { points, .. } if *points == vec![pt(150.0, 200.0), pt(300.0, 300.0)]));
}

#[test]
fn no_edit_line_for_closed_polygon_or_unknown_pointer() {
    let mut scene = Scene::new(Mode::EditSolution);
    scene.doc.import_solution(&closed_triangle());
    scene.active = Some(PolygonRef::Solution);
    scene.pointer = Some(pt(300.0, 300.0));
    assert!(scene.draw().strokes_in(EDIT_LINE_COLOR).is_empty());

    scene.doc.import_solution(&triangle());
    scene.pointer = None;
    assert!(scene.draw().strokes_in(EDIT_LINE_COLOR).is_empty());
}

#[test]
fn no_edit_line_outside_edit_modes() {
    let mut scene = Scene::new(Mode::ShowSolution);
    scene.doc.import_solution(&triangle());
    scene.active = Some(PolygonRef::Solution);
    scene.pointer = Some(pt(300.0, 300.0));
    assert!(scene.draw().strokes_in(EDIT_LINE_COLOR).is_empty());
}

// =============================================================
// Overlay
// =============================================================

#[test]
fn buttons_knock_out_their_icons() {
    let rec = Scene::new(Mode::None).draw();
    assert_eq!(rec.count(|op| *op == Op::Knockout), 2);
    assert_eq!(rec.count(|op| *op == Op::Save), rec.count(|op| *op == Op::Restore));
}

#[test]
fn color_buttons_drawn_in_edit_annotations() {
    let rec = Scene::new(Mode::EditAnnotations).draw();
    for color in ANNOTATION_COLORS {
        assert!(rec.ops.iter().any(|op| matches!(op, Op::Circle { color: c, .. } if c == color)));
    }
    assert!(rec.ops.contains(&Op::Alpha(BUTTON_ENABLED_ALPHA)));
}

#[test]
fn tooltip_only_when_present() {
    let mut scene = Scene::new(Mode::None);
    assert_eq!(scene.draw().count(|op| *op == Op::RoundRect), 0);

    scene.overlay.set_tooltip(Some("Zoom out".into()));
    let rec = scene.draw();
    assert_eq!(rec.count(|op| *op == Op::RoundRect), 1);
    assert!(rec.ops.contains(&Op::Text { text: "Zoom out".into() }));
    assert!(rec.ops.contains(&Op::Alpha(TOOLTIP_ALPHA)));
}

// =============================================================
// Answer points
// =============================================================

#[test]
fn answer_points_from_object_or_array() {
    assert_eq!(answer_points(&json!({ "x": 1, "y": 2 })), vec![pt(1.0, 2.0)]);
    assert_eq!(
        answer_points(&json!([{ "x": 1, "y": 2 }, { "x": 3.5, "y": 4 }])),
        vec![pt(1.0, 2.0), pt(3.5, 4.0)]
    );
}

#[test]
fn answer_points_skip_unusable_shapes() {
    assert!(answer_points(&json!({ "label": "cat" })).is_empty());
    assert!(answer_points(&json!([{ "x": "1", "y": 2 }])).is_empty());
    assert!(answer_points(&json!(7)).is_empty());
}
