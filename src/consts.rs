//! Shared numeric constants for the annotator crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Relative scale change applied per zoom step (10%).
pub const SCALE_STEP: f64 = 0.1;

/// Smallest scale a zoom step may produce. Keeps the transform invertible.
pub const MIN_SCALE: f64 = 0.01;

/// Largest scale a zoom step may produce.
pub const MAX_SCALE: f64 = 100.0;

/// Extra scale added when the image width is the binding dimension on load.
pub const WIDTH_FIT_OVERSCAN: f64 = 0.3;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of the square vertex handle, in canvas pixels.
pub const HANDLE_WIDTH_PX: f64 = 12.0;

// ── Overlay ─────────────────────────────────────────────────────

/// Radius of every overlay button, in canvas pixels.
pub const BUTTON_RADIUS_PX: f64 = 20.0;

/// Gap between overlay buttons and between buttons and the canvas edge.
pub const BUTTON_PADDING_PX: f64 = 10.0;

/// Button alpha when the button is not in its enabled state.
pub const BUTTON_ALPHA: f64 = 0.5;

/// Button alpha when the button is in its enabled state.
pub const BUTTON_ENABLED_ALPHA: f64 = 0.7;

/// Corner radius of the tooltip box.
pub const TOOLTIP_CORNER_RADIUS_PX: f64 = 8.0;

/// Alpha of the tooltip box and text.
pub const TOOLTIP_ALPHA: f64 = 0.5;

/// Font used for the tooltip text. Size matches [`BUTTON_RADIUS_PX`].
pub const TOOLTIP_FONT: &str = "20px sans-serif";

/// Font family used for button icon glyphs.
pub const ICON_FONT_FAMILY: &str = "FontAwesome";

/// Glyph for the zoom-out button.
pub const ICON_ZOOM_OUT: &str = "\u{f010}";

/// Glyph for the zoom-in button.
pub const ICON_ZOOM_IN: &str = "\u{f00e}";

/// Glyph drawn on color buttons.
pub const ICON_COLOR: &str = "\u{f1fc}";

// ── Drawing ─────────────────────────────────────────────────────

/// Default stroke width for polygons and the edit line, in canvas pixels.
pub const DEFAULT_LINE_WIDTH: f64 = 3.0;

/// Color of the line from the last vertex to the pointer while drawing.
pub const EDIT_LINE_COLOR: &str = "#FF3300";

/// Outline color of the solution polygon.
pub const SOLUTION_COLOR: &str = "#33CC33";

/// Marker color for the answer overlay.
pub const ANSWER_COLOR: &str = "#3366FF";

/// Radius of an answer marker, in canvas pixels.
pub const ANSWER_MARKER_RADIUS_PX: f64 = 8.0;

/// Alpha used when filling closed polygons.
pub const POLYGON_FILL_ALPHA: f64 = 0.3;

/// Fixed palette for annotation colors.
pub const ANNOTATION_COLORS: [&str; 6] = ["#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462"];
