//! Floating UI overlay: circular buttons and the hover tooltip.
//!
//! Two independent button columns stack upward from the bottom corners of
//! the canvas: zoom buttons on the right, annotation color buttons on the
//! left. Positions are assigned by [`Overlay::layout`], which runs at the start
//! of every render pass; a button that was never laid out cannot be hit.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::camera::{Camera, Point, Viewport};
use crate::consts::{
    ANNOTATION_COLORS, BUTTON_ALPHA, BUTTON_ENABLED_ALPHA, BUTTON_PADDING_PX, BUTTON_RADIUS_PX, ICON_COLOR,
    ICON_ZOOM_IN, ICON_ZOOM_OUT,
};
use crate::hit::Bounds;

/// What pressing a button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    ZoomIn,
    ZoomOut,
    /// Pick a color from [`ANNOTATION_COLORS`] by index.
    SelectColor(usize),
}

/// Addresses a button in one of the two overlay columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRef {
    /// Right-hand column (zoom controls).
    Default(usize),
    /// Left-hand column (annotation colors).
    Color(usize),
}

/// A circular overlay control.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// Icon-font glyph drawn knocked out of the circle.
    pub icon: Option<&'static str>,
    pub icon_color: &'static str,
    pub tooltip: Option<String>,
    /// Circle fill color.
    pub color: String,
    pub alpha: f64,
    pub enabled_alpha: f64,
    pub enabled: bool,
    /// Border width; zero disables the border.
    pub line_width: f64,
    pub stroke_style: &'static str,
    pub action: ButtonAction,
    /// Center assigned by the last layout pass.
    pub draw_position: Option<Point>,
    pub draw_radius: f64,
}

impl Button {
    #[must_use]
    pub fn new(icon: &'static str, tooltip: &str, action: ButtonAction) -> Self {
        Self {
            icon: Some(icon),
            icon_color: "#ffffff",
            tooltip: Some(tooltip.to_string()),
            color: "#000000".to_string(),
            alpha: BUTTON_ALPHA,
            enabled_alpha: BUTTON_ENABLED_ALPHA,
            enabled: false,
            line_width: 0.0,
            stroke_style: "#000000",
            action,
            draw_position: None,
            draw_radius: 0.0,
        }
    }

    /// Alpha the button is drawn with in its current state.
    #[must_use]
    pub fn current_alpha(&self) -> f64 {
        if self.enabled { self.enabled_alpha } else { self.alpha }
    }
}

impl Bounds for Button {
    fn is_within_bounds(&self, pt: Point, _camera: &Camera, _viewport: Viewport) -> bool {
        let Some(pos) = self.draw_position else {
            return false;
        };
        let dx = pos.x - pt.x;
        let dy = pos.y - pt.y;
        dx * dx + dy * dy <= self.draw_radius * self.draw_radius
    }
}

/// Canvas-space geometry of the tooltip box and its text baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text_x: f64,
    pub text_y: f64,
}

/// Place the tooltip just left of the right-hand button column.
#[must_use]
pub fn tooltip_box(text_width: f64, viewport: Viewport) -> TooltipBox {
    let r = BUTTON_RADIUS_PX;
    let p = BUTTON_PADDING_PX;
    let width = text_width + p;
    let height = r * 0.8 + p;
    let x = viewport.width - (2.0 * r + 2.0 * p) - width;
    TooltipBox {
        x,
        y: viewport.height - height - p,
        width,
        height,
        text_x: x + 0.5 * p,
        text_y: viewport.height - 1.5 * p,
    }
}

/// All overlay buttons plus the current tooltip.
#[derive(Debug, Clone)]
pub struct Overlay {
    buttons: Vec<Button>,
    color_buttons: Vec<Button>,
    tooltip: Option<String>,
}

impl Overlay {
    /// Zoom-out and zoom-in buttons, plus one color button per palette entry
    /// when `with_colors` is set.
    #[must_use]
    pub fn new(with_colors: bool) -> Self {
        let buttons = vec![
            Button::new(ICON_ZOOM_OUT, "Zoom out", ButtonAction::ZoomOut),
            Button::new(ICON_ZOOM_IN, "Zoom in", ButtonAction::ZoomIn),
        ];
        let color_buttons = if with_colors {
            ANNOTATION_COLORS
                .iter()
                .enumerate()
                .map(|(i, color)| {
                    let mut b = Button::new(ICON_COLOR, "Annotation color", ButtonAction::SelectColor(i));
                    b.color = (*color).to_string();
                    b.enabled = i == 0;
                    b
                })
                .collect()
        } else {
            Vec::new()
        };
        Self { buttons, color_buttons, tooltip: None }
    }

    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    #[must_use]
    pub fn color_buttons(&self) -> &[Button] {
        &self.color_buttons
    }

    /// Every button, right column first, each column bottom to top.
    pub fn button_refs(&self) -> impl Iterator<Item = ButtonRef> + use<> {
        let defaults = (0..self.buttons.len()).map(ButtonRef::Default);
        let colors = (0..self.color_buttons.len()).map(ButtonRef::Color);
        defaults.chain(colors)
    }

    #[must_use]
    pub fn button(&self, r: ButtonRef) -> Option<&Button> {
        match r {
            ButtonRef::Default(i) => self.buttons.get(i),
            ButtonRef::Color(i) => self.color_buttons.get(i),
        }
    }

    /// Assign draw positions to both columns for the given canvas size.
    pub fn layout(&mut self, viewport: Viewport) {
        let r = BUTTON_RADIUS_PX;
        let p = BUTTON_PADDING_PX;
        let gap = 2.0 * r + p;
        let bottom = viewport.height - r - p;

        let columns = [(&mut self.buttons, viewport.width - r - p), (&mut self.color_buttons, r + p)];
        for (column, x) in columns {
            for (i, button) in column.iter_mut().enumerate() {
                #[allow(clippy::cast_precision_loss)]
                let y = bottom - gap * i as f64;
                button.draw_position = Some(Point::new(x, y));
                button.draw_radius = r;
            }
        }
    }

    /// Mark the color button at `index` as the enabled one.
    pub fn select_color(&mut self, index: usize) {
        for (i, b) in self.color_buttons.iter_mut().enumerate() {
            b.enabled = i == index;
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Replace the tooltip. Returns true when the text changed.
    pub fn set_tooltip(&mut self, tooltip: Option<String>) -> bool {
        if self.tooltip == tooltip {
            return false;
        }
        self.tooltip = tooltip;
        true
    }
}
