//! Browser binding: the `Viewer` class exported to JavaScript.
//!
//! Owns everything that touches the DOM. It resolves the canvas, loads the
//! image, registers event listeners, drives the frame loop with
//! `requestAnimationFrame`, and delivers [`Action`]s to the host's change
//! callbacks. All decisions are made by [`EngineCore`].

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlImageElement,
    MouseEvent, WheelEvent,
};

use crate::camera::{ImageSize, Point, Viewport};
use crate::engine::{Action, EngineCore};
use crate::error::ViewerError;
use crate::input::{MouseButton, WheelDelta};
use crate::options::{Mode, ViewerOptions};
use crate::render::Surface;
use crate::scheduler::FrameOutcome;

/// Route `log` output to the browser console. Safe to call more than once.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        log::debug!("console logger already installed");
    }
}

// =============================================================
// Canvas surface
// =============================================================

/// [`Surface`] backed by a 2D canvas context and the loaded image.
struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    image: HtmlImageElement,
}

impl CanvasSurface {
    fn trace(&self, points: &[Point], closed: bool) {
        self.ctx.begin_path();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
        }
        for p in iter {
            self.ctx.line_to(p.x, p.y);
        }
        if closed {
            self.ctx.close_path();
        }
    }
}

impl Surface for CanvasSurface {
    type Error = JsValue;

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear(&mut self, viewport: Viewport) {
        self.ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_knockout(&mut self) -> Result<(), JsValue> {
        self.ctx.set_global_composite_operation("destination-out")
    }

    fn draw_image(&mut self, translate: Point, scale: f64) -> Result<(), JsValue> {
        self.ctx.save();
        let drawn = self
            .ctx
            .translate(translate.x, translate.y)
            .and_then(|()| self.ctx.scale(scale, scale))
            .and_then(|()| self.ctx.draw_image_with_html_image_element(&self.image, 0.0, 0.0));
        self.ctx.restore();
        drawn
    }

    fn stroke_path(&mut self, points: &[Point], closed: bool, color: &str, width: f64) {
        self.trace(points, closed);
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn fill_path(&mut self, points: &[Point], color: &str) {
        self.trace(points, true);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: &str) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
        self.ctx.close_path();
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
        Ok(())
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, color: &str, width: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
        self.ctx.close_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + radius, y);
        ctx.line_to(x + w - radius, y);
        ctx.quadratic_curve_to(x + w, y, x + w, y + radius);
        ctx.line_to(x + w, y + h - radius);
        ctx.quadratic_curve_to(x + w, y + h, x + w - radius, y + h);
        ctx.line_to(x + radius, y + h);
        ctx.quadratic_curve_to(x, y + h, x, y + h - radius);
        ctx.line_to(x, y + radius);
        ctx.quadratic_curve_to(x, y, x + radius, y);
        ctx.close_path();
        ctx.set_fill_style_str(color);
        ctx.fill();
    }

    fn measure_text(&mut self, text: &str, font: &str) -> Result<f64, JsValue> {
        self.ctx.set_font(font);
        Ok(self.ctx.measure_text(text)?.width())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) -> Result<(), JsValue> {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_text(text, x, y)
    }
}

// =============================================================
// Host callbacks
// =============================================================

/// Change callbacks taken from the options object.
struct Callbacks {
    on_solution_change: Option<Function>,
    on_annotation_change: Option<Function>,
    on_answer_change: Option<Function>,
}

impl Callbacks {
    /// Collect the callbacks, requiring the one the edit `mode` reports through.
    fn from_options(options: &JsValue, mode: Mode) -> Result<Self, ViewerError> {
        let callbacks = Self {
            on_solution_change: function_field(options, "onSolutionChange"),
            on_annotation_change: function_field(options, "onAnnotationChange"),
            on_answer_change: function_field(options, "onAnswerChange"),
        };
        let required = match mode {
            Mode::EditSolution => Some(("onSolutionChange", callbacks.on_solution_change.is_some())),
            Mode::EditAnnotations => Some(("onAnnotationChange", callbacks.on_annotation_change.is_some())),
            Mode::EditAnswer => Some(("onAnswerChange", callbacks.on_answer_change.is_some())),
            Mode::ShowSolution | Mode::ShowAnnotations | Mode::None => None,
        };
        if let Some((callback, false)) = required {
            return Err(ViewerError::MissingCallback { mode: mode.as_str(), callback });
        }
        Ok(callbacks)
    }

    /// Call the host back for each action, in order.
    fn deliver(&self, actions: Vec<Action>) {
        for action in actions {
            let (name, callback, payload) = match &action {
                Action::SolutionChanged(points) => ("onSolutionChange", &self.on_solution_change, to_js(points)),
                Action::AnnotationsChanged(records) => {
                    ("onAnnotationChange", &self.on_annotation_change, to_js(records))
                }
                Action::AnswerChanged(answer) => ("onAnswerChange", &self.on_answer_change, to_js(answer)),
            };
            let Some(callback) = callback else {
                continue;
            };
            let result = payload.and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(err) = result {
                log::error!("{name} failed: {}", ViewerError::from_js(&err));
            }
        }
    }
}

fn function_field(options: &JsValue, name: &str) -> Option<Function> {
    if !options.is_object() {
        return None;
    }
    match js_sys::Reflect::get(options, &JsValue::from_str(name)) {
        Ok(value) => value.dyn_ref::<Function>().cloned(),
        Err(_) => None,
    }
}

/// Convert a serializable value into a plain JS value.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|err| JsValue::from_str(&err.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// Parse the host's options object. Anything unusable yields defaults.
fn parse_options(options: &JsValue) -> ViewerOptions {
    if options.is_undefined() || options.is_null() {
        return ViewerOptions::default();
    }
    let json = match js_sys::JSON::stringify(options) {
        Ok(json) => String::from(json),
        Err(err) => {
            log::warn!("cannot serialize viewer options: {}", ViewerError::from_js(&err));
            return ViewerOptions::default();
        }
    };
    match ViewerOptions::parse(&json) {
        Ok(parsed) => parsed,
        Err(err) => {
            log::warn!("{err}; using default options");
            ViewerOptions::default()
        }
    }
}

// =============================================================
// Listeners
// =============================================================

/// A registered DOM listener, kept alive until removed.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn listen<F>(
    listeners: &mut Vec<Listener>,
    target: &EventTarget,
    kind: &'static str,
    options: Option<&AddEventListenerOptions>,
    handler: F,
) -> Result<(), ViewerError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let func: &Function = callback.as_ref().unchecked_ref();
    let added = match options {
        Some(opts) => target.add_event_listener_with_callback_and_add_event_listener_options(kind, func, opts),
        None => target.add_event_listener_with_callback(kind, func),
    };
    added.map_err(|err| ViewerError::from_js(&err))?;
    listeners.push(Listener { target: target.clone(), kind, callback });
    Ok(())
}

/// Pointer position relative to the canvas's top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(f64::from(ev.client_x()) - rect.left(), f64::from(ev.client_y()) - rect.top())
}

// =============================================================
// Frame loop
// =============================================================

type FrameHolder = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(holder: &FrameHolder) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let pending = holder.borrow();
    let Some(cb) = pending.as_ref() else {
        return false;
    };
    window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok()
}

/// Start the self-rescheduling frame loop. It ends once the engine is disposed.
fn start_frame_loop(core: Rc<RefCell<EngineCore>>, canvas: HtmlCanvasElement, mut surface: CanvasSurface) {
    let holder: FrameHolder = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        let outcome = {
            let mut core = core.borrow_mut();
            core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
            match core.frame(&mut surface) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::error!("draw failed: {}", ViewerError::from_js(&err));
                    FrameOutcome::Drawn
                }
            }
        };
        if !outcome.reschedule() || !request_frame(&holder_for_cb) {
            log::debug!("frame loop ended");
            holder_for_cb.borrow_mut().take();
        }
    }) as Box<dyn FnMut(f64)>);

    *holder.borrow_mut() = Some(cb);
    if !request_frame(&holder) {
        log::error!("requestAnimationFrame unavailable; viewer will not draw");
        holder.borrow_mut().take();
    }
}

// =============================================================
// Viewer
// =============================================================

/// Interactive image viewer bound to one canvas element.
#[wasm_bindgen]
pub struct Viewer {
    core: Rc<RefCell<EngineCore>>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl Viewer {
    /// Bind a viewer to the canvas with id `canvas_id` and start loading
    /// `image_url`. Pointer down/up listen on `global_target` when given so
    /// drags survive leaving the canvas, otherwise on the canvas itself.
    ///
    /// # Errors
    ///
    /// Fails when the canvas or its 2D context is unavailable, or when an
    /// edit mode is requested without its change callback.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        image_url: &str,
        options: JsValue,
        global_target: Option<EventTarget>,
    ) -> Result<Viewer, JsValue> {
        Ok(Self::create(canvas_id, image_url, &options, global_target)?)
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.core.borrow_mut().zoom_in();
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.core.borrow_mut().zoom_out();
    }

    /// Redraw on the next frame.
    pub fn refresh(&self) {
        self.core.borrow_mut().refresh();
    }

    /// Stop drawing and remove every listener. Calling it again does nothing.
    pub fn dispose(&mut self) {
        self.core.borrow_mut().dispose();
        for listener in self.listeners.drain(..) {
            let func: &Function = listener.callback.as_ref().unchecked_ref();
            if let Err(err) = listener.target.remove_event_listener_with_callback(listener.kind, func) {
                log::warn!("cannot remove {} listener: {}", listener.kind, ViewerError::from_js(&err));
            }
        }
    }

    /// The solution as `{x, y}` records, or `null` when there is none.
    ///
    /// # Errors
    ///
    /// Fails only if the records cannot be converted to JS values.
    #[wasm_bindgen(js_name = exportSolution)]
    pub fn export_solution(&self) -> Result<JsValue, JsValue> {
        match self.core.borrow().export_solution() {
            Some(points) => to_js(&points),
            None => Ok(JsValue::NULL),
        }
    }

    /// Every annotation as `{polygon, color}` records.
    ///
    /// # Errors
    ///
    /// Fails only if the records cannot be converted to JS values.
    #[wasm_bindgen(js_name = exportAnnotations)]
    pub fn export_annotations(&self) -> Result<JsValue, JsValue> {
        to_js(&self.core.borrow().export_annotations())
    }

    /// The current answer, or `null`.
    ///
    /// # Errors
    ///
    /// Fails only if the answer cannot be converted to a JS value.
    pub fn answer(&self) -> Result<JsValue, JsValue> {
        match self.core.borrow().doc.answer.as_ref() {
            Some(answer) => to_js(answer),
            None => Ok(JsValue::NULL),
        }
    }
}

impl Viewer {
    fn create(
        canvas_id: &str,
        image_url: &str,
        options: &JsValue,
        global_target: Option<EventTarget>,
    ) -> Result<Viewer, ViewerError> {
        let window = web_sys::window().ok_or(ViewerError::NoWindow)?;
        let document = window.document().ok_or(ViewerError::NoWindow)?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| ViewerError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ViewerError::NotACanvas(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| ViewerError::from_js(&err))?
            .ok_or(ViewerError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ViewerError::ContextUnavailable)?;

        let parsed = parse_options(options);
        let callbacks = Rc::new(Callbacks::from_options(options, parsed.mode)?);
        let image = HtmlImageElement::new().map_err(|err| ViewerError::from_js(&err))?;

        let core = Rc::new(RefCell::new(EngineCore::new(parsed)));
        core.borrow_mut().set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));

        let mut viewer = Viewer { core: Rc::clone(&core), listeners: Vec::new() };
        let canvas_target: EventTarget = canvas.clone().into();
        let pointer_target = global_target.unwrap_or_else(|| canvas_target.clone());

        {
            let core = Rc::clone(&core);
            let canvas = canvas.clone();
            listen(&mut viewer.listeners, &pointer_target, "mousedown", None, move |ev| {
                if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
                    let at = canvas_point(&canvas, ev);
                    core.borrow_mut().on_pointer_down(at, MouseButton::from_dom(ev.button()));
                }
            })?;
        }
        {
            let core = Rc::clone(&core);
            listen(&mut viewer.listeners, &pointer_target, "mouseup", None, move |ev| {
                if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
                    core.borrow_mut().on_pointer_up(MouseButton::from_dom(ev.button()));
                }
            })?;
        }
        {
            let core = Rc::clone(&core);
            let wheel_options = AddEventListenerOptions::new();
            wheel_options.set_passive(false);
            listen(&mut viewer.listeners, &canvas_target, "wheel", Some(&wheel_options), move |ev| {
                if let Some(ev) = ev.dyn_ref::<WheelEvent>() {
                    ev.prevent_default();
                    core.borrow_mut().on_wheel(WheelDelta { dx: ev.delta_x(), dy: ev.delta_y() });
                }
            })?;
        }
        {
            let core = Rc::clone(&core);
            let callbacks = Rc::clone(&callbacks);
            let canvas = canvas.clone();
            listen(&mut viewer.listeners, &canvas_target, "mousemove", None, move |ev| {
                if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
                    let actions = core.borrow_mut().on_pointer_move(canvas_point(&canvas, ev));
                    callbacks.deliver(actions);
                }
            })?;
        }
        {
            let core = Rc::clone(&core);
            let callbacks = Rc::clone(&callbacks);
            let canvas = canvas.clone();
            listen(&mut viewer.listeners, &canvas_target, "click", None, move |ev| {
                if let Some(ev) = ev.dyn_ref::<MouseEvent>() {
                    let at = canvas_point(&canvas, ev);
                    let actions = core.borrow_mut().on_click(at, MouseButton::from_dom(ev.button()));
                    callbacks.deliver(actions);
                }
            })?;
        }
        let image_target: EventTarget = image.clone().into();
        {
            let core = Rc::clone(&core);
            let loaded = image.clone();
            listen(&mut viewer.listeners, &image_target, "load", None, move |_ev| {
                let size = ImageSize {
                    width: f64::from(loaded.natural_width()),
                    height: f64::from(loaded.natural_height()),
                };
                core.borrow_mut().image_loaded(size);
            })?;
        }
        {
            let url = image_url.to_string();
            listen(&mut viewer.listeners, &image_target, "error", None, move |_ev| {
                log::error!("failed to load image {url}");
            })?;
        }

        image.set_src(image_url);
        log::debug!("viewer bound to #{canvas_id} in mode {}", core.borrow().mode().as_str());
        start_frame_loop(core, canvas, CanvasSurface { ctx, image });
        Ok(viewer)
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        self.dispose();
    }
}
