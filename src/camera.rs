//! Image-space ↔ canvas-space transform.
//!
//! The camera is described by a zoom `scale` and the image-space point shown
//! at the middle of the canvas (`center`). Hit-testing happens in canvas space
//! and the model lives in image space, so every crossing between the two goes
//! through [`Camera::image_to_canvas`] or [`Camera::canvas_to_image`].

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE, SCALE_STEP, WIDTH_FIT_OVERSCAN};

/// A point in either canvas or image space.
///
/// Also the on-the-wire vertex record (`{ "x": .., "y": .. }`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `pt` lies on the canvas. Always false for a zero-sized canvas.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && pt.x >= 0.0
            && pt.y >= 0.0
            && pt.x <= self.width
            && pt.y <= self.height
    }
}

/// Intrinsic pixel size of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

/// Zoom and pan state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Multiplicative zoom factor. Always positive.
    pub scale: f64,
    /// Image-space point drawn at the canvas's visual midpoint.
    pub center: Point,
}

impl Default for Camera {
    fn default() -> Self {
        Self { scale: 1.0, center: Point::default() }
    }
}

/// Per-axis offsets used by both transform directions.
///
/// Returns `(visible, canvas_image)`: the image-space offset of the first
/// visible image column/row, and the canvas-space offset at which the image
/// starts. When the center is closer to the image origin than half the
/// de-scaled canvas, the visible offset is clamped to zero and the image is
/// shifted into the canvas instead.
fn axis_offsets(center: f64, canvas_size: f64, scale: f64) -> (f64, f64) {
    let half = canvas_size / scale / 2.0;
    if center >= half {
        (center - half, 0.0)
    } else {
        (0.0, canvas_size / 2.0 - center * scale)
    }
}

impl Camera {
    /// Convert an image-space point to canvas pixels.
    #[must_use]
    pub fn image_to_canvas(&self, image: Point, viewport: Viewport) -> Point {
        let (visible_x, offset_x) = axis_offsets(self.center.x, viewport.width, self.scale);
        let (visible_y, offset_y) = axis_offsets(self.center.y, viewport.height, self.scale);
        Point {
            x: (image.x - visible_x) * self.scale + offset_x,
            y: (image.y - visible_y) * self.scale + offset_y,
        }
    }

    /// Convert a canvas pixel position to image space.
    #[must_use]
    pub fn canvas_to_image(&self, canvas: Point, viewport: Viewport) -> Point {
        let (visible_x, offset_x) = axis_offsets(self.center.x, viewport.width, self.scale);
        let (visible_y, offset_y) = axis_offsets(self.center.y, viewport.height, self.scale);
        Point {
            x: visible_x + canvas.x / self.scale - offset_x / self.scale,
            y: visible_y + canvas.y / self.scale - offset_y / self.scale,
        }
    }

    /// Canvas translation applied before scaling when drawing the image.
    #[must_use]
    pub fn draw_translation(&self, viewport: Viewport) -> Point {
        Point {
            x: viewport.width / 2.0 - self.center.x * self.scale,
            y: viewport.height / 2.0 - self.center.y * self.scale,
        }
    }

    /// Convert a canvas-space distance to image space.
    #[must_use]
    pub fn descale(&self, canvas_delta: Point) -> Point {
        Point { x: canvas_delta.x / self.scale, y: canvas_delta.y / self.scale }
    }

    /// Fit a freshly loaded image into the viewport and center on it.
    ///
    /// Images that are strictly height-bound fill the canvas height exactly.
    /// Everything else, including an exact aspect match, is treated as
    /// width-bound and gets [`WIDTH_FIT_OVERSCAN`] on top of the exact fit.
    /// Returns false and leaves the camera untouched when either size is
    /// degenerate.
    pub fn fit_image(&mut self, image: ImageSize, viewport: Viewport) -> bool {
        if image.width <= 0.0 || image.height <= 0.0 || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return false;
        }
        self.scale = if viewport.height / image.height * image.width < viewport.width {
            viewport.height / image.height
        } else {
            viewport.width / image.width + WIDTH_FIT_OVERSCAN
        };
        self.center = Point::new(image.width / 2.0, image.height / 2.0);
        true
    }

    /// Grow the scale by one step. Returns false when the step would pass
    /// [`MAX_SCALE`].
    pub fn zoom_in(&mut self) -> bool {
        let next = self.scale * (1.0 + SCALE_STEP);
        if next > MAX_SCALE {
            return false;
        }
        self.scale = next;
        true
    }

    /// Shrink the scale by one step. Returns false when the step would pass
    /// [`MIN_SCALE`].
    pub fn zoom_out(&mut self) -> bool {
        let next = self.scale * (1.0 - SCALE_STEP);
        if next < MIN_SCALE {
            return false;
        }
        self.scale = next;
        true
    }
}
