use crate::camera::{Camera, ImageSize, Point, Viewport};
use crate::consts::ANNOTATION_COLORS;
use crate::doc::{AnnotationRecord, Document, PolygonRef};
use crate::hit::{HitScene, HitTarget, Propagation, hit_test};
use crate::input::{MouseButton, MoveTarget, PointerState, WheelDelta};
use crate::options::{Mode, ViewerOptions, Visibility};
use crate::overlay::{ButtonAction, Overlay};
use crate::polygon::{MIN_CLOSED_LEN, Vertex};
use crate::render::{self, SceneView, Surface};
use crate::scheduler::{FrameOutcome, LoopState, RenderScheduler};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Change notifications returned from input handlers for the host to deliver.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The solution polygon changed; carries the exported solution.
    SolutionChanged(Vec<Point>),
    /// An annotation changed; carries every exported annotation.
    AnnotationsChanged(Vec<AnnotationRecord>),
    /// The answer was set by a canvas click.
    AnswerChanged(serde_json::Value),
}

/// Core engine state: all logic that does not depend on the browser.
///
/// Separated from [`crate::web::Viewer`] so it can be tested natively. Input
/// handlers mutate the scene and mark it dirty; [`EngineCore::frame`] redraws
/// only when something changed.
pub struct EngineCore {
    pub doc: Document,
    pub camera: Camera,
    pub overlay: Overlay,
    pub pointer: PointerState,
    scheduler: RenderScheduler,
    mode: Mode,
    visibility: Visibility,
    active: Option<PolygonRef>,
    image: Option<ImageSize>,
    viewport: Viewport,
    color_index: usize,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(ViewerOptions::default())
    }
}

impl EngineCore {
    /// Build an engine and import any polygons carried by `options`.
    #[must_use]
    pub fn new(options: ViewerOptions) -> Self {
        let visibility = options.mode.visibility();
        let mut doc = Document::new();
        doc.answer = options.answer;
        if let Some(solution) = options.solution.as_deref() {
            doc.import_solution(solution);
        }
        if let Some(annotations) = options.annotations.as_deref() {
            doc.import_annotations(annotations);
        }

        Self {
            doc,
            camera: Camera::default(),
            overlay: Overlay::new(visibility.annotations_editable),
            pointer: PointerState::default(),
            scheduler: RenderScheduler::new(),
            mode: options.mode,
            visibility,
            active: None,
            image: None,
            viewport: Viewport::default(),
            color_index: 0,
        }
    }

    // --- Host inputs ---

    /// Update the canvas size. Marks dirty when it changed.
    #[allow(clippy::float_cmp)]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if self.viewport.width == width && self.viewport.height == height {
            return;
        }
        self.viewport = Viewport::new(width, height);
        self.scheduler.mark_dirty();
    }

    /// The image finished loading: fit it into the canvas and center on it.
    pub fn image_loaded(&mut self, size: ImageSize) {
        self.image = Some(size);
        if self.camera.fit_image(size, self.viewport) {
            log::info!(
                "image {}x{} fitted at scale {:.3}",
                size.width,
                size.height,
                self.camera.scale
            );
        } else {
            log::warn!(
                "cannot fit image {}x{} into canvas {}x{}",
                size.width,
                size.height,
                self.viewport.width,
                self.viewport.height
            );
        }
        self.scheduler.mark_dirty();
    }

    /// Replace the solution polygon with an imported record.
    pub fn import_solution(&mut self, record: &[Point]) {
        self.doc.import_solution(record);
        if self.active == Some(PolygonRef::Solution) {
            self.active = None;
        }
        self.scheduler.mark_dirty();
    }

    /// Replace all annotations with imported records.
    pub fn import_annotations(&mut self, records: &[AnnotationRecord]) {
        self.doc.import_annotations(records);
        if matches!(self.active, Some(PolygonRef::Annotation(_))) {
            self.active = None;
        }
        self.scheduler.mark_dirty();
    }

    // --- Operations ---

    pub fn zoom_in(&mut self) {
        if self.camera.zoom_in() {
            self.scheduler.mark_dirty();
        }
    }

    pub fn zoom_out(&mut self) {
        if self.camera.zoom_out() {
            self.scheduler.mark_dirty();
        }
    }

    /// Force a redraw on the next frame.
    pub fn refresh(&mut self) {
        self.scheduler.mark_dirty();
    }

    /// Stop the render loop for good. Returns false if already disposed.
    pub fn dispose(&mut self) -> bool {
        let stopped = self.scheduler.stop();
        if stopped {
            log::debug!("engine disposed");
        }
        stopped
    }

    // --- Frame ---

    /// Run one frame tick, redrawing onto `surface` only when dirty.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a surface call fails during the redraw.
    pub fn frame<S: Surface>(&mut self, surface: &mut S) -> Result<FrameOutcome, S::Error> {
        let outcome = self.scheduler.begin_frame();
        if outcome == FrameOutcome::Drawn {
            self.overlay.layout(self.viewport);
            let scene = SceneView {
                doc: &self.doc,
                overlay: &self.overlay,
                camera: &self.camera,
                viewport: self.viewport,
                image: self.image,
                visibility: self.visibility,
                active: self.active,
                pointer: self.pointer.last_pos,
            };
            render::draw(surface, &scene)?;
        }
        Ok(outcome)
    }

    // --- Input events ---

    /// Topmost interactive element at a canvas point.
    #[must_use]
    pub fn hit(&self, pt: Point) -> Option<HitTarget> {
        let scene = HitScene {
            overlay: &self.overlay,
            doc: &self.doc,
            camera: &self.camera,
            viewport: self.viewport,
            editable: self.active.filter(|_| self.visibility.polygon_editing()),
        };
        hit_test(pt, &scene)
    }

    /// Primary press: let the element under the pointer claim it, else start a drag.
    pub fn on_pointer_down(&mut self, pt: Point, button: MouseButton) {
        if button != MouseButton::Primary {
            return;
        }
        self.pointer.press();
        let handled = self
            .hit(pt)
            .is_some_and(|target| self.element_mouse_down(target) == Propagation::Stop);
        if !handled {
            self.pointer.left_button_down = true;
        }
    }

    /// Primary release: end any drag; the next drag pans.
    pub fn on_pointer_up(&mut self, button: MouseButton) {
        if button == MouseButton::Primary {
            self.pointer.release();
        }
    }

    /// Primary click: element hook first, then the canvas default. The click
    /// that ends a drag is ignored entirely.
    pub fn on_click(&mut self, pt: Point, button: MouseButton) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != MouseButton::Primary {
            return actions;
        }
        if self.pointer.dragged {
            log::trace!("click ending a drag ignored");
            return actions;
        }
        let propagation = match self.hit(pt) {
            Some(target) => self.element_click(target, &mut actions),
            None => Propagation::Continue,
        };
        if propagation == Propagation::Continue {
            self.canvas_click(pt, &mut actions);
        }
        actions
    }

    /// Scroll up zooms out, anything else zooms in.
    pub fn on_wheel(&mut self, delta: WheelDelta) {
        if delta.zooms_out() {
            self.zoom_out();
        } else {
            self.zoom_in();
        }
    }

    /// Pointer moved to canvas point `pt`.
    ///
    /// While the primary button is held the delta pans the image or moves the
    /// grabbed vertex. Otherwise the hovered element and tooltip are updated.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        let delta = self.pointer.advance(pt);

        if self.pointer.left_button_down {
            if delta != Point::default() {
                self.pointer.dragged = true;
            }
            let step = self.camera.descale(delta);
            match self.pointer.move_target {
                MoveTarget::Center => {
                    self.camera.center.x -= step.x;
                    self.camera.center.y -= step.y;
                }
                MoveTarget::Vertex(v) => {
                    if let Some(vertex) = self.doc.vertex_mut(v) {
                        vertex.translate(step);
                        actions.push(self.change_action(v.polygon));
                    }
                }
            }
            self.scheduler.mark_dirty();
        } else {
            let target = self.hit(pt);
            if target != self.pointer.focus {
                let tooltip = target.and_then(|t| self.tooltip_of(t));
                if self.overlay.set_tooltip(tooltip) {
                    self.scheduler.mark_dirty();
                }
                self.pointer.focus = target;
            }
        }

        if self.visibility.polygon_editing() {
            self.scheduler.mark_dirty();
        }
        actions
    }

    // --- Element hooks ---

    fn element_mouse_down(&mut self, target: HitTarget) -> Propagation {
        if let HitTarget::Vertex(v) = target {
            self.pointer.move_target = MoveTarget::Vertex(v);
        }
        Propagation::Continue
    }

    fn element_click(&mut self, target: HitTarget, actions: &mut Vec<Action>) -> Propagation {
        match target {
            HitTarget::Button(b) => {
                if let Some(action) = self.overlay.button(b).map(|btn| btn.action) {
                    self.run_button(action, actions);
                }
                Propagation::Stop
            }
            HitTarget::Vertex(v) => {
                let closes = v.index == 0
                    && self.active == Some(v.polygon)
                    && self
                        .doc
                        .polygon(v.polygon)
                        .is_some_and(|p| !p.is_closed() && p.len() >= MIN_CLOSED_LEN);
                if closes {
                    if let Some(polygon) = self.doc.polygon_mut(v.polygon) {
                        polygon.close();
                    }
                    log::debug!("closed polygon {:?}", v.polygon);
                    actions.push(self.change_action(v.polygon));
                    self.scheduler.mark_dirty();
                }
                Propagation::Stop
            }
            HitTarget::Polygon(p) => {
                let selectable =
                    self.is_editable(p) && self.doc.polygon(p).is_some_and(|poly| !poly.is_closed());
                if selectable {
                    self.set_active(Some(p));
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            }
        }
    }

    fn run_button(&mut self, action: ButtonAction, actions: &mut Vec<Action>) {
        match action {
            ButtonAction::ZoomIn => self.zoom_in(),
            ButtonAction::ZoomOut => self.zoom_out(),
            ButtonAction::SelectColor(index) => {
                let Some(color) = ANNOTATION_COLORS.get(index) else {
                    return;
                };
                self.color_index = index;
                self.overlay.select_color(index);
                if let Some(active @ PolygonRef::Annotation(_)) = self.active {
                    if self.doc.set_color(active, color) {
                        actions.push(self.change_action(active));
                    }
                }
                self.scheduler.mark_dirty();
            }
        }
    }

    /// Click that no element consumed: grow polygons or set the answer.
    fn canvas_click(&mut self, pt: Point, actions: &mut Vec<Action>) {
        let image_pt = self.camera.canvas_to_image(pt, self.viewport);

        if self.visibility.polygon_editing() {
            let Some(target) = self.drawing_target() else {
                return;
            };
            if let Some(polygon) = self.doc.polygon_mut(target) {
                if polygon.push(Vertex::from(image_pt)) {
                    actions.push(self.change_action(target));
                }
            }
            self.set_active(Some(target));
        } else if self.visibility.answer_editable {
            let answer = serde_json::json!({ "x": image_pt.x, "y": image_pt.y });
            self.doc.answer = Some(answer.clone());
            actions.push(Action::AnswerChanged(answer));
            self.scheduler.mark_dirty();
        }
    }

    /// Polygon a canvas click should append to, creating one when needed.
    fn drawing_target(&mut self) -> Option<PolygonRef> {
        if let Some(active) = self.active {
            if self.is_editable(active) && self.doc.polygon(active).is_some_and(|p| !p.is_closed()) {
                return Some(active);
            }
        }
        if self.visibility.solution_editable {
            return match self.doc.solution.as_ref() {
                None => Some(self.doc.reset_solution()),
                Some(solution) if !solution.is_closed() => Some(PolygonRef::Solution),
                Some(_) => None,
            };
        }
        if self.visibility.annotations_editable {
            let color = ANNOTATION_COLORS.get(self.color_index).unwrap_or(&ANNOTATION_COLORS[0]);
            return Some(self.doc.push_annotation(color));
        }
        None
    }

    fn is_editable(&self, target: PolygonRef) -> bool {
        match target {
            PolygonRef::Solution => self.visibility.solution_editable,
            PolygonRef::Annotation(_) => self.visibility.annotations_editable,
        }
    }

    fn set_active(&mut self, target: Option<PolygonRef>) {
        if self.active != target {
            log::debug!("active polygon {:?} -> {:?}", self.active, target);
            self.active = target;
        }
        self.scheduler.mark_dirty();
    }

    fn tooltip_of(&self, target: HitTarget) -> Option<String> {
        match target {
            HitTarget::Button(b) => self.overlay.button(b).and_then(|btn| btn.tooltip.clone()),
            HitTarget::Vertex(_) | HitTarget::Polygon(_) => None,
        }
    }

    fn change_action(&self, target: PolygonRef) -> Action {
        match target {
            PolygonRef::Solution => Action::SolutionChanged(self.doc.export_solution().unwrap_or_default()),
            PolygonRef::Annotation(_) => Action::AnnotationsChanged(self.doc.export_annotations()),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The polygon currently selected for editing.
    #[must_use]
    pub fn active_polygon(&self) -> Option<PolygonRef> {
        self.active
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.scheduler.state() == LoopState::Stopped
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.overlay.tooltip()
    }

    /// Palette index used for new annotations.
    #[must_use]
    pub fn selected_color(&self) -> usize {
        self.color_index
    }

    #[must_use]
    pub fn export_solution(&self) -> Option<Vec<Point>> {
        self.doc.export_solution()
    }

    #[must_use]
    pub fn export_annotations(&self) -> Vec<AnnotationRecord> {
        self.doc.export_annotations()
    }
}
